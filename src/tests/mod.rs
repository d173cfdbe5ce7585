// Tests module
// End-to-end slashing scenarios and property suites

pub mod properties;
