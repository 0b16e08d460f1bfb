mod helpers;
mod test_changelog;
mod test_init;
mod test_pipeline;
mod test_version;
