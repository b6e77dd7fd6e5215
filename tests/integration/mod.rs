//! Integration tests driving the `gantry` binary against temporary projects

mod helpers;

mod test_changelog;
mod test_check_rules;
mod test_docs;
mod test_release;
mod test_tasks;
