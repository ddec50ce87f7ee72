//! Typed wrappers for the identity service's admin surface.
//!
//! Every call goes through the [`RequestGateway`], so renewal and forced
//! logout apply uniformly.

use std::sync::Arc;

use reqwest::Method;

use super::types::{
    AuditLog, Detail, NewAccount, Permission, RegisteredUser, Role, User, UserPatch,
};
use super::{RequestGateway, endpoints};
use crate::error::RequestError;

mod account;
mod audit;
mod roles;
mod users;

#[derive(Clone)]
pub struct AdminApi {
    gateway: Arc<RequestGateway>,
}

impl AdminApi {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        Self { gateway }
    }
}

#[cfg(test)]
#[path = "../tests/remote/api_tests.rs"]
mod tests;
