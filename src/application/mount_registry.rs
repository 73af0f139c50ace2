// Mount registry - Builds one dashboard per configured board and mounts it
use crate::application::board_catalog::BoardCatalog;
use crate::application::dashboard::{BoardContext, Dashboard, DashboardBuilder};
use crate::application::timeseries_source::TimeSeriesSource;
use crate::domain::path_address::{PathAddress, PathError};
use crate::infrastructure::config::{BoardAssembly, Settings};
use crate::infrastructure::mount_table::MountTable;
use indexmap::IndexMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MountError {
    #[error("invalid dashboard address: {0}")]
    InvalidAddress(#[from] PathError),

    #[error("mount point {path:?} must start and end with '/'")]
    InvalidMountPoint { path: String },

    #[error("a dashboard is already mounted at {path}")]
    DuplicateMount { path: String },

    #[error("unknown dashboard builder {name:?} (known builders: {known:?})")]
    UnknownBuilder { name: String, known: Vec<String> },

    #[error(transparent)]
    Builder(anyhow::Error),
}

/// Arguments of one [`MountRegistry::assemble`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleArgs<'a> {
    pub tenant_name: &'a str,
    pub builder: &'a str,
    pub service_path: &'a str,
    pub board_path: &'a str,
}

/// Streams dashboard assembly arguments out of the settings: tenants in
/// configuration order, then each tenant's boards in list order.
pub struct DashboardsConfig<'a> {
    boards: &'a IndexMap<String, Vec<BoardAssembly>>,
}

impl<'a> DashboardsConfig<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            boards: &settings.boards,
        }
    }

    pub fn assemble_args(&self) -> impl Iterator<Item = AssembleArgs<'a>> + use<'a> {
        let boards = self.boards;
        boards.iter().flat_map(|(tenant_name, assemblies)| {
            assemblies
                .iter()
                .map(move |assembly| Self::args_from_config(tenant_name, assembly))
        })
    }

    fn args_from_config(tenant_name: &'a str, assembly: &'a BoardAssembly) -> AssembleArgs<'a> {
        let or_root = |path: &'a Option<String>| match path.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => "/",
        };

        AssembleArgs {
            tenant_name,
            builder: &assembly.builder,
            service_path: or_root(&assembly.service_path),
            board_path: or_root(&assembly.board_path),
        }
    }
}

/// Assembles dashboards and mounts them on one server's mount table.
pub struct MountRegistry {
    server: MountTable,
    catalog: BoardCatalog,
    source: Arc<dyn TimeSeriesSource>,
    mounted: Vec<PathAddress>,
}

impl MountRegistry {
    pub fn new(server: MountTable, catalog: BoardCatalog, source: Arc<dyn TimeSeriesSource>) -> Self {
        Self {
            server,
            catalog,
            source,
            mounted: Vec::new(),
        }
    }

    /// Create a dashboard at the address of (tenant, service path, board
    /// path), have `builder` populate it, then mount it.
    pub fn assemble(
        &mut self,
        builder: &dyn DashboardBuilder,
        tenant_name: &str,
        service_path: &str,
        board_path: &str,
    ) -> Result<(), MountError> {
        let address = PathAddress::new(tenant_name, service_path, board_path)?;
        let base_path = address.render();

        let ctx = BoardContext {
            address: address.clone(),
            source: self.source.clone(),
        };
        let dashboard = builder
            .build(Dashboard::new(base_path.clone()), &ctx)
            .map_err(MountError::Builder)?;

        self.server.mount(base_path.clone(), dashboard.into_router())?;
        tracing::info!(
            "Mounted dashboard at {} (tenant={}, service_path={})",
            base_path,
            address.tenant(),
            address.service_path()
        );
        self.mounted.push(address);

        Ok(())
    }

    /// Mount every board the settings describe, stopping at the first failure.
    pub fn mount_all(&mut self, settings: &Settings) -> Result<(), MountError> {
        for args in DashboardsConfig::new(settings).assemble_args() {
            let builder = self.catalog.resolve(args.builder)?;
            tracing::debug!("Assembling {:?}", args);
            self.assemble(
                builder.as_ref(),
                args.tenant_name,
                args.service_path,
                args.board_path,
            )?;
        }
        Ok(())
    }

    /// Addresses of the mounted dashboards, in mount order.
    pub fn mounted(&self) -> &[PathAddress] {
        &self.mounted
    }

    pub fn into_server(self) -> MountTable {
        self.server
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard::RouteError;
    use crate::application::timeseries_source::fake::FakeSource;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn passthrough(dashboard: Dashboard, _ctx: &BoardContext) -> anyhow::Result<Dashboard> {
        Ok(dashboard)
    }

    fn registry(catalog: BoardCatalog) -> MountRegistry {
        MountRegistry::new(MountTable::new(), catalog, Arc::new(FakeSource::default()))
    }

    fn settings(boards: Vec<(&str, Vec<BoardAssembly>)>) -> Settings {
        Settings {
            boards: boards
                .into_iter()
                .map(|(tenant, assemblies)| (tenant.to_string(), assemblies))
                .collect(),
            ..Settings::default()
        }
    }

    fn args_of(settings: &Settings) -> Vec<(String, String, String, String)> {
        DashboardsConfig::new(settings)
            .assemble_args()
            .map(|a| {
                (
                    a.builder.to_string(),
                    a.tenant_name.to_string(),
                    a.service_path.to_string(),
                    a.board_path.to_string(),
                )
            })
            .collect()
    }

    fn row(builder: &str, tenant: &str, sp: &str, bp: &str) -> (String, String, String, String) {
        (builder.into(), tenant.into(), sp.into(), bp.into())
    }

    #[test]
    fn test_assemble_args_empty_config() {
        assert!(args_of(&settings(vec![])).is_empty());
    }

    #[test]
    fn test_assemble_args_tenant_with_no_board() {
        assert!(args_of(&settings(vec![("t", vec![])])).is_empty());
    }

    #[test]
    fn test_assemble_args_one_tenant_many_boards() {
        let cfg = settings(vec![(
            "t",
            vec![
                BoardAssembly::new("b1"),
                BoardAssembly::new("b2")
                    .with_service_path("/sp")
                    .with_board_path("/bp"),
            ],
        )]);

        assert_eq!(
            args_of(&cfg),
            vec![row("b1", "t", "/", "/"), row("b2", "t", "/sp", "/bp")]
        );
    }

    #[test]
    fn test_assemble_args_many_tenants_some_without_boards() {
        let cfg = settings(vec![
            ("t1", vec![BoardAssembly::new("b1").with_board_path("/b/p")]),
            ("t0", vec![]),
            (
                "t2",
                vec![
                    BoardAssembly::new("b1"),
                    BoardAssembly::new("b2")
                        .with_service_path("/sp")
                        .with_board_path("/bp"),
                ],
            ),
        ]);

        assert_eq!(
            args_of(&cfg),
            vec![
                row("b1", "t1", "/", "/b/p"),
                row("b1", "t2", "/", "/"),
                row("b2", "t2", "/sp", "/bp"),
            ]
        );
    }

    #[test]
    fn test_assemble_args_empty_paths_mean_root() {
        let cfg = settings(vec![(
            "t",
            vec![BoardAssembly::new("b1").with_service_path("").with_board_path("")],
        )]);
        assert_eq!(args_of(&cfg), vec![row("b1", "t", "/", "/")]);
    }

    #[test]
    fn test_assemble_args_is_restartable() {
        let cfg = settings(vec![("t", vec![BoardAssembly::new("b1")])]);
        let stream = DashboardsConfig::new(&cfg);
        assert_eq!(stream.assemble_args().count(), 1);
        assert_eq!(stream.assemble_args().count(), 1);
    }

    #[test]
    fn test_mount_all_mounts_in_configuration_order() {
        let mut catalog = BoardCatalog::new();
        catalog.register("b1", passthrough).register("b2", passthrough);
        let mut registry = registry(catalog);

        let cfg = settings(vec![
            ("t1", vec![BoardAssembly::new("b1").with_board_path("/b/p")]),
            (
                "t2",
                vec![
                    BoardAssembly::new("b1"),
                    BoardAssembly::new("b2")
                        .with_service_path("/sp")
                        .with_board_path("/bp"),
                ],
            ),
        ]);
        registry.mount_all(&cfg).unwrap();

        let mounted: Vec<String> = registry.mounted().iter().map(PathAddress::render).collect();
        assert_eq!(
            mounted,
            vec!["/dazzler/t1/-/b/p/", "/dazzler/t2/-/", "/dazzler/t2/sp/-/bp/"]
        );

        let server = registry.into_server();
        assert_eq!(server.paths().count(), 3);
    }

    #[test]
    fn test_builder_sees_its_own_address() {
        fn checking(dashboard: Dashboard, ctx: &BoardContext) -> anyhow::Result<Dashboard> {
            let own = dashboard.address()?;
            anyhow::ensure!(own == ctx.address, "address mismatch");
            anyhow::ensure!(own.tenant() == "acme" && own.service_path() == "/line/1/");
            Ok(dashboard)
        }

        let mut registry = registry(BoardCatalog::new());
        registry.assemble(&checking, "acme", "line/1", "/").unwrap();
    }

    #[test]
    fn test_duplicate_mount_aborts_before_later_boards() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let counting = move |dashboard: Dashboard, _ctx: &BoardContext| -> anyhow::Result<Dashboard> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(dashboard)
        };

        let mut catalog = BoardCatalog::new();
        catalog.register("b", counting);
        let mut registry = registry(catalog);

        let cfg = settings(vec![(
            "t",
            vec![
                BoardAssembly::new("b").with_service_path("/sp"),
                BoardAssembly::new("b").with_service_path("sp/"),
                BoardAssembly::new("b").with_board_path("/later"),
            ],
        )]);

        match registry.mount_all(&cfg) {
            Err(MountError::DuplicateMount { path }) => assert_eq!(path, "/dazzler/t/sp/-/"),
            other => panic!("expected duplicate mount, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(registry.mounted().len(), 1);
        assert_eq!(registry.into_server().paths().count(), 1);
    }

    #[test]
    fn test_empty_tenant_aborts_startup() {
        let mut catalog = BoardCatalog::new();
        catalog.register("b", passthrough);
        let mut registry = registry(catalog);

        let cfg = settings(vec![("", vec![BoardAssembly::new("b")])]);
        assert!(matches!(
            registry.mount_all(&cfg),
            Err(MountError::InvalidAddress(PathError::EmptyTenant))
        ));
        assert!(registry.mounted().is_empty());
    }

    #[test]
    fn test_unknown_builder_aborts_startup() {
        let mut registry = registry(BoardCatalog::new());
        let cfg = settings(vec![("t", vec![BoardAssembly::new("missing")])]);

        assert!(matches!(
            registry.mount_all(&cfg),
            Err(MountError::UnknownBuilder { .. })
        ));
    }

    #[test]
    fn test_builder_claiming_a_reserved_route_aborts_mount() {
        fn greedy(dashboard: Dashboard, _ctx: &BoardContext) -> anyhow::Result<Dashboard> {
            Ok(dashboard.route("/_config", axum::routing::get(|| async { "mine" }))?)
        }

        let mut registry = registry(BoardCatalog::new());
        let err = registry.assemble(&greedy, "t", "/", "/").unwrap_err();

        match err {
            MountError::Builder(e) => assert_eq!(
                e.downcast_ref::<RouteError>(),
                Some(&RouteError::Reserved("/_config".to_string()))
            ),
            other => panic!("expected a builder error, got {:?}", other),
        }
        assert!(registry.mounted().is_empty());
    }

    #[test]
    fn test_builder_error_propagates_unchanged() {
        fn failing(_dashboard: Dashboard, _ctx: &BoardContext) -> anyhow::Result<Dashboard> {
            anyhow::bail!("no widgets for you")
        }

        let mut registry = registry(BoardCatalog::new());
        let err = registry.assemble(&failing, "t", "/", "/").unwrap_err();

        assert!(matches!(err, MountError::Builder(_)));
        assert_eq!(err.to_string(), "no widgets for you");
        assert!(registry.mounted().is_empty());
    }
}
