mod discovery_test;
mod failure_test;
mod move_test;
mod stop_test;
