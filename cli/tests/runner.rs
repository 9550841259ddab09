mod common;

mod test_add_set_remove;
mod test_clone;
mod test_commit_and_log;
mod test_init;
