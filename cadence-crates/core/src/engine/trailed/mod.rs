mod trailed_values;

pub(crate) use trailed_values::TrailedInteger;
pub(crate) use trailed_values::TrailedValues;
