use migrate::errors::ErrorKind;
use migrate::executor::ExecutorRegistry;
use migrate::migration::Migrator;
use migrate_bash_adapter::BashModule;
use migrate_int_test::test_util::{bash_registry, cleanup, create_test_context, run_test};

#[test]
fn test_bash_url_resolves_executor_and_location() {
    run_test(
        create_test_context,
        |ctx| {
            let (executor, location) = ctx.registry().resolve_url("bash:/srv/migrations")?;
            assert_eq!(executor.name(), "bash");
            assert_eq!(location, "/srv/migrations");

            assert_eq!(ctx.migrator().executor().name(), "bash");
            assert_eq!(ctx.migrator().config().source_dir().as_deref(), Some(ctx.dir()));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_unknown_scheme_fails_open() {
    let registry = bash_registry().expect("registry should load");
    let err = Migrator::builder()
        .url(&registry, "python:/srv/migrations")
        .open()
        .err()
        .expect("unknown scheme must fail");
    assert_eq!(err.kind(), &ErrorKind::ExecutorNotFound);
    assert!(err.message().contains("bash"));
}

#[test]
fn test_url_without_scheme_fails_open() {
    let registry = bash_registry().expect("registry should load");
    let err = Migrator::builder()
        .url(&registry, "/srv/migrations")
        .open()
        .err()
        .expect("missing scheme must fail");
    assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
}

#[test]
fn test_module_with_environment() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.write_change_file("4_env.up.sh", "echo \"target=$TARGET_DB\"\n");

            let registry = ExecutorRegistry::new();
            registry.load_module(Box::new(
                BashModule::with_config().env("TARGET_DB", "inventory").build(),
            ))?;
            let migrator = Migrator::builder()
                .url(&registry, &format!("bash:{}", ctx.dir().display()))
                .journal_path(ctx.dir().join("env-journal"))
                .open()?;

            let report = migrator.up()?;
            let last = report.executed.last().expect("unit 4 should have run");
            assert_eq!(last.output, vec!["target=inventory"]);
            migrator.close()?;
            Ok(())
        },
        cleanup,
    )
}
