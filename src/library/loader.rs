use super::permission::{PermissionProvider, PermissionStatus};
use super::scan::{AssetQuery, AssetSource, SortOrder};
use super::{Catalog, MediaItem, MediaType};
use crate::error::MediaError;

/// What a load produced. `permission_denied` drives the "grant access" alert.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub catalog: Catalog,
    pub permission_denied: bool,
}

/// Builds the catalog for one screen activation.
///
/// Never fails: denial and enumeration errors both fall back to the sample
/// catalog so the rest of the screen always has something to work with.
pub struct CatalogLoader<P, S> {
    permission: P,
    source: S,
    limit: usize,
    include_samples: bool,
}

impl<P: PermissionProvider, S: AssetSource> CatalogLoader<P, S> {
    pub fn new(permission: P, source: S, limit: usize, include_samples: bool) -> Self {
        Self {
            permission,
            source,
            limit,
            include_samples,
        }
    }

    pub fn load(&mut self) -> LoadOutcome {
        match self.try_load() {
            Ok(catalog) => {
                log::info!("Loaded {} media item(s)", catalog.len());
                LoadOutcome {
                    catalog,
                    permission_denied: false,
                }
            }
            Err(MediaError::PermissionDenied) => {
                log::warn!("Media folder access denied, using sample media");
                LoadOutcome {
                    catalog: Catalog::samples(),
                    permission_denied: true,
                }
            }
            Err(e) => {
                log::warn!("Media loading error: {}", e);
                LoadOutcome {
                    catalog: Catalog::samples(),
                    permission_denied: false,
                }
            }
        }
    }

    fn try_load(&mut self) -> Result<Catalog, MediaError> {
        match self.permission.request_permission()? {
            PermissionStatus::Granted => {}
            PermissionStatus::Denied => return Err(MediaError::PermissionDenied),
        }

        let query = AssetQuery {
            types: vec![MediaType::Video, MediaType::Audio],
            limit: self.limit,
            sort: SortOrder::CreationTimeDesc,
        };
        let device_items: Vec<MediaItem> = self
            .source
            .list_assets(&query)
            .map_err(|e| MediaError::CatalogLoadFailure(e.to_string()))?
            .into_iter()
            .map(MediaItem::from)
            .collect();

        if self.include_samples {
            Ok(Catalog::with_samples(device_items))
        } else {
            Ok(Catalog::new(device_items))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MediaResult;
    use crate::library::scan::AssetRecord;
    use crate::library::MediaFilter;
    use std::cell::RefCell;

    struct FakePermission(MediaResult<PermissionStatus>);

    impl PermissionProvider for FakePermission {
        fn request_permission(&mut self) -> MediaResult<PermissionStatus> {
            match &self.0 {
                Ok(status) => Ok(*status),
                Err(_) => Err(MediaError::CatalogLoadFailure("permission service down".into())),
            }
        }

        fn open_system_settings(&self) -> MediaResult<()> {
            Ok(())
        }
    }

    struct FakeSource {
        records: MediaResult<Vec<AssetRecord>>,
        queries: RefCell<Vec<AssetQuery>>,
    }

    impl FakeSource {
        fn with(records: Vec<AssetRecord>) -> Self {
            Self {
                records: Ok(records),
                queries: RefCell::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                records: Err(MediaError::CatalogLoadFailure("disk gone".into())),
                queries: RefCell::new(Vec::new()),
            }
        }
    }

    impl AssetSource for FakeSource {
        fn list_assets(&self, query: &AssetQuery) -> MediaResult<Vec<AssetRecord>> {
            self.queries.borrow_mut().push(query.clone());
            match &self.records {
                Ok(records) => Ok(records.clone()),
                Err(e) => Err(MediaError::CatalogLoadFailure(e.to_string())),
            }
        }
    }

    fn record(id: &str, media_type: MediaType) -> AssetRecord {
        AssetRecord {
            id: id.to_string(),
            uri: format!("/media/{}", id),
            filename: format!("{}.file", id),
            media_type,
            duration_ms: 42_000,
            creation_time: Some(1),
        }
    }

    #[test]
    fn test_granted_appends_samples_after_device_items() {
        let source = FakeSource::with(vec![record("d1", MediaType::Video), record("d2", MediaType::Audio)]);
        let mut loader = CatalogLoader::new(FakePermission(Ok(PermissionStatus::Granted)), source, 100, true);

        let outcome = loader.load();
        assert!(!outcome.permission_denied);
        let ids: Vec<_> = outcome.catalog.items().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["d1", "d2", "sample-1", "sample-2", "sample-3", "sample-4", "sample-5"]);
        assert_eq!(outcome.catalog.items()[0].filename, "d1.file");
        assert_eq!(outcome.catalog.items()[0].duration_ms, 42_000);
    }

    #[test]
    fn test_granted_device_only() {
        let source = FakeSource::with(vec![record("d1", MediaType::Video)]);
        let mut loader = CatalogLoader::new(FakePermission(Ok(PermissionStatus::Granted)), source, 100, false);

        let outcome = loader.load();
        assert_eq!(outcome.catalog.len(), 1);
    }

    #[test]
    fn test_query_shape() {
        let source = FakeSource::with(vec![]);
        let mut loader = CatalogLoader::new(FakePermission(Ok(PermissionStatus::Granted)), source, 250, false);
        loader.load();

        let queries = loader.source.queries.borrow();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].limit, 250);
        assert_eq!(queries[0].sort, SortOrder::CreationTimeDesc);
        assert_eq!(queries[0].types, vec![MediaType::Video, MediaType::Audio]);
    }

    #[test]
    fn test_denied_falls_back_to_samples() {
        let mut loader = CatalogLoader::new(
            FakePermission(Ok(PermissionStatus::Denied)),
            FakeSource::with(vec![record("d1", MediaType::Video)]),
            100,
            true,
        );

        let outcome = loader.load();
        assert!(outcome.permission_denied);
        assert_eq!(outcome.catalog, Catalog::samples());
        assert_eq!(outcome.catalog.count(MediaFilter::Video), 3);
        assert_eq!(outcome.catalog.count(MediaFilter::Audio), 2);
        // Denied means the source is never touched.
        assert!(loader.source.queries.borrow().is_empty());
    }

    #[test]
    fn test_enumeration_error_falls_back_to_samples() {
        let mut loader = CatalogLoader::new(
            FakePermission(Ok(PermissionStatus::Granted)),
            FakeSource::failing(),
            100,
            false,
        );

        let outcome = loader.load();
        assert!(!outcome.permission_denied);
        assert_eq!(outcome.catalog, Catalog::samples());
    }

    #[test]
    fn test_permission_error_falls_back_to_samples() {
        let mut loader = CatalogLoader::new(
            FakePermission(Err(MediaError::PermissionDenied)),
            FakeSource::with(vec![]),
            100,
            true,
        );

        assert_eq!(loader.load().catalog.len(), 5);
    }
}
