mod assignability;
mod reduction;
mod snapshot;
