pub(crate) mod meta;
pub(crate) mod search;
pub(crate) mod update;
