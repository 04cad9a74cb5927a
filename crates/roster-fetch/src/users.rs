//! The user directory as a cached resource.

use roster_core::user::User;

use crate::{
  cache::{Cache, CacheConfig},
  error::FetchError,
  fetcher::JsonFetcher,
  resource::Resource,
};

/// The fixed collection endpoint.
pub const USERS_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/users";

pub type UsersFetcher = JsonFetcher<Vec<User>>;
pub type UsersCache = Cache<String, UsersFetcher>;
pub type UsersResource = Resource<String, UsersFetcher>;

/// Build a cache for user collections over HTTP.
pub fn users_cache(config: CacheConfig) -> Result<UsersCache, FetchError> {
  Ok(Cache::new(UsersFetcher::new()?, config))
}

/// Subscribe to the collection at `endpoint` and start loading it.
pub fn users_resource(cache: &UsersCache, endpoint: impl Into<String>) -> UsersResource {
  Resource::new(cache.clone(), Some(endpoint.into()))
}
