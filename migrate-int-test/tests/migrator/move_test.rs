use migrate::file::{Direction, Version};
use migrate_int_test::test_util::{cleanup, create_test_context, run_test};

fn steps(report: &migrate::migration::MoveReport) -> Vec<(u64, Direction)> {
    report
        .steps()
        .into_iter()
        .map(|(version, direction)| (version.into(), direction))
        .collect()
}

#[test]
fn test_up_applies_everything_in_order() {
    run_test(
        create_test_context,
        |ctx| {
            let report = ctx.migrator().up()?;
            assert_eq!(
                steps(&report),
                vec![
                    (1, Direction::Forward),
                    (2, Direction::Forward),
                    (3, Direction::Forward)
                ]
            );
            assert_eq!(report.executed[0].label, "create_users");
            assert_eq!(report.executed[0].output, vec!["ran 1 up"]);
            assert_eq!(ctx.effects(), vec!["1 up", "2 up", "3 up"]);
            assert_eq!(ctx.migrator().version()?, Some(Version::new(3)));

            // nothing left to apply
            assert!(ctx.migrator().up()?.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_down_reverts_newest_first() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.migrator().up()?;
            let report = ctx.migrator().down()?;
            assert_eq!(
                steps(&report),
                vec![
                    (3, Direction::Reverse),
                    (2, Direction::Reverse),
                    (1, Direction::Reverse)
                ]
            );
            assert_eq!(ctx.effects()[3..].to_vec(), vec!["3 down", "2 down", "1 down"]);
            assert_eq!(ctx.migrator().version()?, None);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_relative_moves() {
    run_test(
        create_test_context,
        |ctx| {
            let migrator = ctx.migrator();

            migrator.migrate(2)?;
            assert_eq!(ctx.applied_versions()?, vec![1, 2]);

            migrator.migrate(-1)?;
            assert_eq!(ctx.applied_versions()?, vec![1]);

            // clamped to the two remaining units
            let report = migrator.migrate(10)?;
            assert_eq!(report.len(), 2);
            assert_eq!(ctx.applied_versions()?, vec![1, 2, 3]);

            assert!(migrator.migrate(0)?.is_empty());

            let report = migrator.migrate(-10)?;
            assert_eq!(report.len(), 3);
            assert!(ctx.applied_versions()?.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_redo_reverts_and_reapplies_latest() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.migrator().up()?;
            let report = ctx.migrator().redo()?;
            assert_eq!(
                steps(&report),
                vec![(3, Direction::Reverse), (3, Direction::Forward)]
            );
            assert_eq!(ctx.applied_versions()?, vec![1, 2, 3]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_redo_with_nothing_applied() {
    run_test(
        create_test_context,
        |ctx| {
            assert!(ctx.migrator().redo()?.is_empty());
            assert!(ctx.effects().is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_reset_runs_everything_down_then_up() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.migrator().migrate(2)?;
            let report = ctx.migrator().reset()?;
            assert_eq!(
                steps(&report),
                vec![
                    (2, Direction::Reverse),
                    (1, Direction::Reverse),
                    (1, Direction::Forward),
                    (2, Direction::Forward),
                    (3, Direction::Forward)
                ]
            );
            assert_eq!(ctx.applied_versions()?, vec![1, 2, 3]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_gap_in_applied_set_is_filled_by_up() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.migrator().up()?;
            ctx.migrator().close()?;
            std::fs::write(ctx.journal_file(), "1\n3\n")?;

            let migrator = migrate::migration::Migrator::builder()
                .url(&ctx.registry(), &format!("bash:{}", ctx.dir().display()))
                .open()?;
            let report = migrator.up()?;
            let versions: Vec<u64> = report.steps().into_iter().map(|(v, _)| v.into()).collect();
            assert_eq!(versions, vec![2]);

            let report = migrator.migrate(-1)?;
            assert_eq!(report.executed[0].version, Version::new(3));
            migrator.close()?;
            Ok(())
        },
        cleanup,
    )
}
