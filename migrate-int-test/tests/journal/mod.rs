mod file_journal_test;
mod journal_recovery_test;
