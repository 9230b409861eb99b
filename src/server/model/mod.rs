use serde::{Deserialize, Deserializer};

pub(crate) mod admin;
pub(crate) mod cart;
pub(crate) mod config;
pub(crate) mod form;
pub(crate) mod menu;
pub(crate) mod money;
pub(crate) mod order;

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
