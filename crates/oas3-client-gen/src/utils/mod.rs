pub mod spec;

pub(crate) use spec::SpecFile;
