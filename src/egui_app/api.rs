//! REST API Client
//!
//! All traffic to the backend goes through the [`MessagingApi`] trait. The
//! production implementation, [`HttpApi`], speaks JSON over HTTP with reqwest
//! to a json-server style backend (collections addressed as `/<name>` and
//! `/<name>/:id`, filtering through query parameters).
//!
//! # Usage
//!
//! ```rust,no_run
//! use wachat::egui_app::api::{HttpApi, MessagingApi};
//! use wachat::egui_app::Config;
//!
//! # async fn example() -> Result<(), wachat::egui_app::ClientError> {
//! let api = HttpApi::new(Config::default());
//! let contacts = api.list_contacts(&"7".into()).await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::egui_app::config::Config;
use crate::egui_app::error::ClientError;
use crate::shared::messaging::{
    Contact, ContactId, DeliveryState, DeliveryStatePatch, Group, GroupId, GroupPatch, Message,
    MessageId, NewContact, NewGroup, NewMessage, NewUser, User, UserId,
};

/// Filter for `GET /users`; unset fields are not sent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub username: Option<String>,
    pub phone: Option<String>,
}

impl UserQuery {
    pub fn credentials(username: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            phone: Some(phone.into()),
        }
    }

    pub fn username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            phone: None,
        }
    }

    pub fn phone(phone: impl Into<String>) -> Self {
        Self {
            username: None,
            phone: Some(phone.into()),
        }
    }

    fn pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(username) = &self.username {
            pairs.push(("username", username.as_str()));
        }
        if let Some(phone) = &self.phone {
            pairs.push(("phone", phone.as_str()));
        }
        pairs
    }
}

/// Backend operations used by the client
#[async_trait]
pub trait MessagingApi: Send + Sync {
    /// `GET /contacts?userId=<owner>`
    async fn list_contacts(&self, owner: &UserId) -> Result<Vec<Contact>, ClientError>;

    /// `POST /contacts`
    async fn create_contact(&self, contact: &NewContact) -> Result<Contact, ClientError>;

    /// `PATCH /contacts/:id {blocked: true}`
    async fn block_contact(&self, id: &ContactId) -> Result<(), ClientError>;

    /// `DELETE /contacts/:id`
    async fn delete_contact(&self, id: &ContactId) -> Result<(), ClientError>;

    /// One direction of a conversation: `GET /messages?senderId=&recipientId=`
    async fn list_messages(
        &self,
        sender: &UserId,
        recipient: &UserId,
    ) -> Result<Vec<Message>, ClientError>;

    /// Every message addressed to `recipient`: `GET /messages?recipientId=`
    async fn list_inbox(&self, recipient: &UserId) -> Result<Vec<Message>, ClientError>;

    /// `POST /messages`; the backend assigns the id
    async fn create_message(&self, message: &NewMessage) -> Result<Message, ClientError>;

    /// `PATCH /messages/:id {deliveryState}`
    async fn update_delivery_state(
        &self,
        id: &MessageId,
        state: DeliveryState,
    ) -> Result<Message, ClientError>;

    /// `GET /users?...`
    async fn find_users(&self, query: &UserQuery) -> Result<Vec<User>, ClientError>;

    /// `POST /users`
    async fn create_user(&self, user: &NewUser) -> Result<User, ClientError>;

    /// `GET /groups`
    async fn list_groups(&self) -> Result<Vec<Group>, ClientError>;

    /// `POST /groups`
    async fn create_group(&self, group: &NewGroup) -> Result<Group, ClientError>;

    /// `PATCH /groups/:id`
    async fn update_group(&self, id: &GroupId, patch: &GroupPatch) -> Result<Group, ClientError>;

    /// `PATCH /conversations/:id {archived: true}`
    async fn archive_conversation(&self, id: &ContactId) -> Result<(), ClientError>;

    /// `DELETE /conversations/:id`
    async fn delete_conversation(&self, id: &ContactId) -> Result<(), ClientError>;
}

/// reqwest-backed [`MessagingApi`]
#[derive(Debug, Clone)]
pub struct HttpApi {
    config: Config,
    client: Client,
}

impl HttpApi {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn with_client(config: Config, client: Client) -> Self {
        Self { config, client }
    }

    fn url(&self, path: &str) -> String {
        self.config.api_url(path)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = send(request).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_json<T, B>(&self, request: RequestBuilder, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        self.fetch(request.json(body)).await
    }

    async fn execute(&self, request: RequestBuilder) -> Result<(), ClientError> {
        send(request).await.map(|_| ())
    }
}

/// Send a request and turn non-2xx statuses into [`ClientError::Server`]
async fn send(request: RequestBuilder) -> Result<Response, ClientError> {
    let response = request
        .send()
        .await
        .map_err(|e| ClientError::network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| status.to_string());
        return Err(ClientError::server(status.as_u16(), body));
    }
    Ok(response)
}

#[async_trait]
impl MessagingApi for HttpApi {
    async fn list_contacts(&self, owner: &UserId) -> Result<Vec<Contact>, ClientError> {
        let request = self
            .client
            .get(self.url("/contacts"))
            .query(&[("userId", owner.as_str())]);
        self.fetch(request).await
    }

    async fn create_contact(&self, contact: &NewContact) -> Result<Contact, ClientError> {
        let request = self.client.post(self.url("/contacts"));
        self.fetch_json(request, contact).await
    }

    async fn block_contact(&self, id: &ContactId) -> Result<(), ClientError> {
        let request = self
            .client
            .patch(self.url(&format!("/contacts/{}", id)))
            .json(&json!({ "blocked": true }));
        self.execute(request).await
    }

    async fn delete_contact(&self, id: &ContactId) -> Result<(), ClientError> {
        let request = self.client.delete(self.url(&format!("/contacts/{}", id)));
        self.execute(request).await
    }

    async fn list_messages(
        &self,
        sender: &UserId,
        recipient: &UserId,
    ) -> Result<Vec<Message>, ClientError> {
        let app = self.config.app();
        let request = self.client.get(self.url("/messages")).query(&[
            (app.sender_param.as_str(), sender.as_str()),
            (app.recipient_param.as_str(), recipient.as_str()),
        ]);
        self.fetch(request).await
    }

    async fn list_inbox(&self, recipient: &UserId) -> Result<Vec<Message>, ClientError> {
        let request = self
            .client
            .get(self.url("/messages"))
            .query(&[(self.config.app().recipient_param.as_str(), recipient.as_str())]);
        self.fetch(request).await
    }

    async fn create_message(&self, message: &NewMessage) -> Result<Message, ClientError> {
        let request = self.client.post(self.url("/messages"));
        self.fetch_json(request, message).await
    }

    async fn update_delivery_state(
        &self,
        id: &MessageId,
        state: DeliveryState,
    ) -> Result<Message, ClientError> {
        let request = self.client.patch(self.url(&format!("/messages/{}", id)));
        let patch = DeliveryStatePatch {
            delivery_state: state,
        };
        self.fetch_json(request, &patch).await
    }

    async fn find_users(&self, query: &UserQuery) -> Result<Vec<User>, ClientError> {
        let request = self.client.get(self.url("/users")).query(&query.pairs());
        self.fetch(request).await
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, ClientError> {
        let request = self.client.post(self.url("/users"));
        self.fetch_json(request, user).await
    }

    async fn list_groups(&self) -> Result<Vec<Group>, ClientError> {
        self.fetch(self.client.get(self.url("/groups"))).await
    }

    async fn create_group(&self, group: &NewGroup) -> Result<Group, ClientError> {
        let request = self.client.post(self.url("/groups"));
        self.fetch_json(request, group).await
    }

    async fn update_group(&self, id: &GroupId, patch: &GroupPatch) -> Result<Group, ClientError> {
        let request = self.client.patch(self.url(&format!("/groups/{}", id)));
        self.fetch_json(request, patch).await
    }

    async fn archive_conversation(&self, id: &ContactId) -> Result<(), ClientError> {
        let request = self
            .client
            .patch(self.url(&format!("/conversations/{}", id)))
            .json(&json!({ "archived": true }));
        self.execute(request).await
    }

    async fn delete_conversation(&self, id: &ContactId) -> Result<(), ClientError> {
        let request = self
            .client
            .delete(self.url(&format!("/conversations/{}", id)));
        self.execute(request).await
    }
}
