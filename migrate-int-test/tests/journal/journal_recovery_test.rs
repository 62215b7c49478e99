use migrate::errors::ErrorKind;
use migrate::migration::Migrator;
use migrate_int_test::test_util::{cleanup, create_test_context, run_test};
use std::fs;

#[test]
fn test_corrupt_journal_refuses_to_open() {
    run_test(
        create_test_context,
        |ctx| {
            fs::write(ctx.journal_file(), "1\nnot-a-version\n")?;

            let result = Migrator::builder()
                .url(&ctx.registry(), &format!("bash:{}", ctx.dir().display()))
                .open();
            match result {
                Ok(_) => panic!("a corrupt journal must not open"),
                Err(e) => assert_eq!(e.kind(), &ErrorKind::JournalCorrupt),
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_hand_edited_journal_with_blank_lines_loads() {
    run_test(
        create_test_context,
        |ctx| {
            fs::write(ctx.journal_file(), "\n 2 \n\n1\n")?;

            let migrator = Migrator::builder()
                .url(&ctx.registry(), &format!("bash:{}", ctx.dir().display()))
                .open()?;
            let pending: Vec<String> = migrator
                .pending()?
                .iter()
                .map(|file| file.file_name().to_string())
                .collect();
            assert_eq!(pending, vec!["3_seed.up.sh"]);
            migrator.close()?;
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_no_temp_file_left_after_moves() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.migrator().up()?;
            ctx.migrator().down()?;

            let leftovers: Vec<_> = fs::read_dir(ctx.dir())?
                .filter_map(Result::ok)
                .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
                .collect();
            assert!(leftovers.is_empty());
            assert_eq!(fs::read_to_string(ctx.journal_file())?, "");
            Ok(())
        },
        cleanup,
    )
}
