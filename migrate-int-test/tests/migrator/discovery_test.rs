use migrate::errors::ErrorKind;
use migrate::file::Version;
use migrate_int_test::test_util::{
    cleanup, create_empty_test_context, create_test_context, recording_script, run_test,
};
use std::fs;

#[test]
fn test_pairs_up_and_down_files() {
    run_test(
        create_test_context,
        |ctx| {
            let units = ctx.migrator().change_units()?;
            let versions: Vec<u64> = units.versions().into_iter().map(u64::from).collect();
            assert_eq!(versions, vec![1, 2, 3]);

            let unit = units.get(Version::new(2)).expect("unit 2 should exist");
            assert_eq!(unit.forward().map(|f| f.file_name()), Some("2_add_email.up.sh"));
            assert_eq!(unit.reverse().map(|f| f.file_name()), Some("2_add_email.down.sh"));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_foreign_files_are_ignored() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.write_change_file("README.md", "notes");
            ctx.write_change_file("4_other.up.sql", "select 1;");
            ctx.write_change_file("five_bad.up.sh", "echo no");
            fs::create_dir_all(ctx.dir().join("6_nested.up.sh"))?;

            let units = ctx.migrator().change_units()?;
            assert_eq!(units.len(), 3);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_files_added_after_open_are_discovered() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.migrator().up()?;
            ctx.write_change_file("4_index.up.sh", &recording_script());

            let pending = ctx.migrator().pending()?;
            assert_eq!(pending.len(), 1);
            assert_eq!(pending[0].version(), Version::new(4));

            ctx.migrator().up()?;
            assert_eq!(ctx.applied_versions()?, vec![1, 2, 3, 4]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_duplicate_version_fails_the_move() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.write_change_file("2_again.up.sh", &recording_script());

            let err = ctx.migrator().up().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::DuplicateVersion);
            assert!(ctx.effects().is_empty());
            assert!(ctx.applied_versions()?.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_one_sided_units() {
    run_test(
        create_empty_test_context,
        |ctx| {
            ctx.write_change_file("1_init.up.sh", &recording_script());
            ctx.write_change_file("2_cleanup.down.sh", &recording_script());

            let report = ctx.migrator().up()?;
            let steps: Vec<u64> = report.steps().into_iter().map(|(v, _)| v.into()).collect();
            assert_eq!(steps, vec![1]);

            // version 1 has no down file so there is nothing to revert
            let report = ctx.migrator().down()?;
            assert!(report.is_empty());
            assert_eq!(ctx.applied_versions()?, vec![1]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_empty_directory_is_a_no_op() {
    run_test(
        create_empty_test_context,
        |ctx| {
            assert!(ctx.migrator().up()?.is_empty());
            assert!(ctx.migrator().down()?.is_empty());
            assert!(ctx.migrator().migrate(5)?.is_empty());
            assert_eq!(ctx.migrator().version()?, None);
            Ok(())
        },
        cleanup,
    )
}
