pub mod enablement_tests;
pub mod unit_tests;
pub mod version_tests;
