//! Endpoints of the fund referential API.
//!
//! | Method | Path                                       | Variant                          |
//! |--------|--------------------------------------------|----------------------------------|
//! | GET    | `/funds/?skip=&limit=`                     | [`Endpoint::ListFunds`]          |
//! | GET    | `/funds/{id}`                              | [`Endpoint::Fund`]               |
//! | GET    | `/funds/search?q=`                         | [`Endpoint::Search`]             |
//! | GET    | `/funds/{id}/hierarchy?direction=children&levels=` | [`Endpoint::Hierarchy`]  |
//! | GET    | `/funds/{id}/hierarchy/children?depth=`    | [`Endpoint::HierarchyChildren`]  |
//! | GET    | `/funds/managed-by/{mgmt_id}?page=&limit=` | [`Endpoint::ManagedBy`]          |
//! | GET    | `/management/?skip=&limit=`                | [`Endpoint::ListManagement`]     |
//! | POST   | `/ingest/upload`                           | [`Endpoint::IngestUpload`]       |

use urlencoding::encode;

use crate::models::Depth;

/// HTTP method of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One call the frontend can make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    ListFunds { skip: usize, limit: usize },
    Fund { id: String },
    /// The query is sent verbatim, only URL-encoded. Empty queries included.
    Search { query: String },
    /// Older route, answered with one row per reachable subfund.
    Hierarchy { id: String, depth: Depth },
    HierarchyChildren { id: String, depth: Depth },
    /// `page` is 1-indexed.
    ManagedBy { mgmt_id: String, page: usize, limit: usize },
    ListManagement { skip: usize, limit: usize },
    /// Multipart body with fields `file` and `target`.
    IngestUpload,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::IngestUpload => Method::Post,
            _ => Method::Get,
        }
    }

    /// Path and query string, relative to the API base URL.
    pub fn path(&self) -> String {
        match self {
            Endpoint::ListFunds { skip, limit } => {
                format!("/funds/?skip={skip}&limit={limit}")
            }
            Endpoint::Fund { id } => format!("/funds/{}", encode(id)),
            Endpoint::Search { query } => format!("/funds/search?q={}", encode(query)),
            Endpoint::Hierarchy { id, depth } => format!(
                "/funds/{}/hierarchy?direction=children&levels={depth}",
                encode(id)
            ),
            Endpoint::HierarchyChildren { id, depth } => {
                format!("/funds/{}/hierarchy/children?depth={depth}", encode(id))
            }
            Endpoint::ManagedBy {
                mgmt_id,
                page,
                limit,
            } => format!(
                "/funds/managed-by/{}?page={page}&limit={limit}",
                encode(mgmt_id)
            ),
            Endpoint::ListManagement { skip, limit } => {
                format!("/management/?skip={skip}&limit={limit}")
            }
            Endpoint::IngestUpload => "/ingest/upload".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_paths() {
        assert_eq!(
            Endpoint::ListFunds { skip: 20, limit: 10 }.path(),
            "/funds/?skip=20&limit=10"
        );
        assert_eq!(
            Endpoint::ListManagement { skip: 0, limit: 100 }.path(),
            "/management/?skip=0&limit=100"
        );
    }

    #[test]
    fn test_search_query_is_encoded_verbatim() {
        let path = Endpoint::Search {
            query: "alpha & beta/1".into(),
        }
        .path();
        assert_eq!(path, "/funds/search?q=alpha%20%26%20beta%2F1");

        assert_eq!(
            Endpoint::Search { query: String::new() }.path(),
            "/funds/search?q="
        );
    }

    #[test]
    fn test_id_segments_are_encoded() {
        assert_eq!(
            Endpoint::Fund { id: "LU 01/A".into() }.path(),
            "/funds/LU%2001%2FA"
        );
        assert_eq!(
            Endpoint::Hierarchy {
                id: "F1".into(),
                depth: Depth::MAX
            }
            .path(),
            "/funds/F1/hierarchy?direction=children&levels=3"
        );
    }

    #[test]
    fn test_children_and_managed_by() {
        let depth = Depth::try_from(2).unwrap();
        assert_eq!(
            Endpoint::HierarchyChildren { id: "F1".into(), depth }.path(),
            "/funds/F1/hierarchy/children?depth=2"
        );
        assert_eq!(
            Endpoint::ManagedBy {
                mgmt_id: "M01".into(),
                page: 1,
                limit: 100
            }
            .path(),
            "/funds/managed-by/M01?page=1&limit=100"
        );
    }

    #[test]
    fn test_methods() {
        assert_eq!(Endpoint::IngestUpload.method(), Method::Post);
        assert_eq!(Endpoint::Fund { id: "F".into() }.method(), Method::Get);
    }
}
