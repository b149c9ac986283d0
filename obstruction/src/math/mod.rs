mod linspace;
mod mercator;

pub(crate) use {linspace::linspace, mercator::web_mercator};
