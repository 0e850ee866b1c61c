//! UI route table.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::models::EntityKind;

/// Every screen the UI can show.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    List(EntityKind),
    New(EntityKind),
    Detail(EntityKind, String),
    Edit(EntityKind, String),
    /// Catch-all; keeps the unmatched path for the 404 screen.
    NotFound(String),
}

fn segment(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Patient => "patients",
        EntityKind::Staff => "staff",
        EntityKind::Horse => "horses",
        EntityKind::Session => "sessions",
    }
}

fn kind_for(segment: &str) -> Option<EntityKind> {
    EntityKind::ALL
        .into_iter()
        .find(|kind| self::segment(*kind) == segment)
}

impl Route {
    /// Match a path such as `/patients/abc/edit`. Never fails.
    pub fn parse(path: &str) -> Route {
        let trimmed = path.split(['?', '#']).next().unwrap_or("");
        let parts: Vec<&str> = trimmed.split('/').filter(|p| !p.is_empty()).collect();

        match parts.as_slice() {
            [] => Route::Dashboard,
            [seg] => match kind_for(seg) {
                Some(kind) => Route::List(kind),
                None => Route::NotFound(path.to_string()),
            },
            [seg, "new"] => match kind_for(seg) {
                Some(kind) => Route::New(kind),
                None => Route::NotFound(path.to_string()),
            },
            [seg, id] => match kind_for(seg) {
                Some(kind) => Route::Detail(kind, (*id).to_string()),
                None => Route::NotFound(path.to_string()),
            },
            [seg, id, "edit"] => match kind_for(seg) {
                Some(kind) => Route::Edit(kind, (*id).to_string()),
                None => Route::NotFound(path.to_string()),
            },
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Dashboard => "/".to_string(),
            Route::List(kind) => format!("/{}", segment(*kind)),
            Route::New(kind) => format!("/{}/new", segment(*kind)),
            Route::Detail(kind, id) => format!("/{}/{}", segment(*kind), id),
            Route::Edit(kind, id) => format!("/{}/{}/edit", segment(*kind), id),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Entity kind the route belongs to, if any.
    pub fn kind(&self) -> Option<EntityKind> {
        match self {
            Route::List(kind)
            | Route::New(kind)
            | Route::Detail(kind, _)
            | Route::Edit(kind, _) => Some(*kind),
            Route::Dashboard | Route::NotFound(_) => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Routes serialize as their path.
impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_path_round_trip() {
        let routes = [
            Route::Dashboard,
            Route::List(EntityKind::Patient),
            Route::New(EntityKind::Staff),
            Route::Detail(EntityKind::Horse, "hrs-1".into()),
            Route::Edit(EntityKind::Session, "ses-3".into()),
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn test_parse_tolerates_trailing_slash_and_query() {
        assert_eq!(Route::parse("/horses/"), Route::List(EntityKind::Horse));
        assert_eq!(
            Route::parse("/patients/pat-1?tab=notes"),
            Route::Detail(EntityKind::Patient, "pat-1".into())
        );
        assert_eq!(Route::parse(""), Route::Dashboard);
    }

    #[test]
    fn test_unknown_paths_are_not_found() {
        assert_eq!(
            Route::parse("/pacientes"),
            Route::NotFound("/pacientes".into())
        );
        assert!(matches!(
            Route::parse("/patients/1/edit/extra"),
            Route::NotFound(_)
        ));
        assert!(matches!(Route::parse("/patients/1/delete"), Route::NotFound(_)));
    }

    #[test]
    fn test_kind() {
        assert_eq!(
            Route::parse("/staff/new").kind(),
            Some(EntityKind::Staff)
        );
        assert_eq!(Route::Dashboard.kind(), None);
    }
}
