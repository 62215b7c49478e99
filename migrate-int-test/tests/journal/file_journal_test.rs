use migrate::errors::MigrateResult;
use migrate::file::Version;
use migrate::journal::{FileJournal, Journal};
use migrate::migration::Migrator;
use migrate_int_test::test_util::{cleanup, create_test_context, run_test};
use std::fs;

#[test]
fn test_journal_file_lists_applied_versions() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.migrator().migrate(2)?;

            let text = fs::read_to_string(ctx.journal_file())?;
            assert_eq!(text, "1\n2\n");
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_versions_survive_reopen() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.migrator().up()?;
            ctx.migrator().migrate(-1)?;
            ctx.migrator().close()?;

            let reopened = Migrator::builder()
                .url(&ctx.registry(), &format!("bash:{}", ctx.dir().display()))
                .open()?;
            let versions: Vec<u64> = reopened.versions()?.into_iter().map(u64::from).collect();
            assert_eq!(versions, vec![1, 2]);
            assert_eq!(reopened.version()?, Some(Version::new(2)));
            reopened.close()?;
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_reopened_migrator_only_runs_pending() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.migrator().migrate(1)?;
            ctx.migrator().close()?;

            let reopened = Migrator::builder()
                .url(&ctx.registry(), &format!("bash:{}", ctx.dir().display()))
                .open()?;
            let report = reopened.up()?;
            let steps: Vec<u64> = report.steps().into_iter().map(|(v, _)| v.into()).collect();
            assert_eq!(steps, vec![2, 3]);
            reopened.close()?;

            assert_eq!(ctx.effects(), vec!["1 up", "2 up", "3 up"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_custom_journal_path() {
    run_test(
        create_test_context,
        |ctx| {
            let journal_path = ctx.dir().join("state").join("applied.txt");
            fs::create_dir_all(journal_path.parent().unwrap_or(ctx.dir()))?;

            let migrator = Migrator::builder()
                .url(&ctx.registry(), &format!("bash:{}", ctx.dir().display()))
                .journal_path(&journal_path)
                .open()?;
            migrator.up()?;
            migrator.close()?;

            assert_eq!(fs::read_to_string(&journal_path)?, "1\n2\n3\n");
            assert!(!ctx.journal_file().exists());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_file_journal_shared_with_migrator_state() -> MigrateResult<()> {
    let dir = migrate_int_test::test_util::random_path();
    fs::create_dir_all(&dir)?;
    let path = dir.join("journal");

    let journal = Journal::new(FileJournal::open(&path)?);
    journal.record(Version::new(5))?;
    journal.record(Version::new(3))?;
    journal.close()?;

    let journal = Journal::new(FileJournal::open(&path)?);
    assert_eq!(journal.latest_version()?, Some(Version::new(5)));
    assert_eq!(journal.current_versions()?.len(), 2);
    journal.close()?;

    fs::remove_dir_all(dir)?;
    Ok(())
}
