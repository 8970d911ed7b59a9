mod authorization;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use typed_builder::TypedBuilder;

pub use self::authorization::AuthMiddleware;

#[derive(TypedBuilder)]
pub struct MiddlewareMenu {
    client: reqwest::Client,
    auth: AuthMiddleware,
}

impl MiddlewareMenu {
    pub fn make(self) -> ClientWithMiddleware {
        let Self { client, auth } = self;
        ClientBuilder::new(client).with(auth).build()
    }
}
