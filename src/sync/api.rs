use async_trait::async_trait;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::domain::{UserDraft, UserId, UserRecord};
use crate::user_actor::UserError;

/// The remote users collection.
///
/// | Method | Path          | Body            |
/// |--------|---------------|-----------------|
/// | GET    | `/users`      |                 |
/// | POST   | `/users`      | `{name, email}` |
/// | PUT    | `/users/{id}` | `{name, email}` |
/// | DELETE | `/users/{id}` |                 |
#[async_trait]
pub trait UserApi: Send + Sync {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, UserError>;
    /// `Ok` once the service accepts the write. Carries the stored record
    /// when the response body is one.
    async fn create_user(&self, draft: &UserDraft) -> Result<Option<UserRecord>, UserError>;
    async fn update_user(&self, id: &UserId, draft: &UserDraft) -> Result<Option<UserRecord>, UserError>;
    async fn delete_user(&self, id: &UserId) -> Result<(), UserError>;
}

/// [`UserApi`] over HTTP. Any non-2xx status counts as a failure; error
/// bodies are not read. A 2xx write whose body is not a user record still
/// counts as accepted.
#[derive(Debug, Clone)]
pub struct HttpUserApi {
    url: Url,
    http_client: reqwest::Client,
}

impl HttpUserApi {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            http_client: reqwest::Client::new(),
        }
    }

    /// `{base}/users` or `{base}/users/{id}`, keeping any path prefix of the
    /// base URL.
    fn endpoint(&self, id: Option<&UserId>) -> Result<Url, UserError> {
        let mut url = self.url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| UserError::Rejected(format!("{} cannot be a base URL", self.url)))?;
            segments.pop_if_empty().push("users");
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.http_client.request(method, url)
    }
}

async fn stored_record(response: reqwest::Response) -> Option<UserRecord> {
    match response.json().await {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(error = %e, "Write accepted without a user record in the response");
            None
        }
    }
}

#[async_trait]
impl UserApi for HttpUserApi {
    #[instrument(skip(self))]
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, UserError> {
        let url = self.endpoint(None)?;
        debug!(%url, "GET");
        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    #[instrument(skip(self))]
    async fn create_user(&self, draft: &UserDraft) -> Result<Option<UserRecord>, UserError> {
        let url = self.endpoint(None)?;
        debug!(%url, "POST");
        let response = self
            .request(reqwest::Method::POST, url)
            .json(draft)
            .send()
            .await?
            .error_for_status()?;
        Ok(stored_record(response).await)
    }

    #[instrument(skip(self))]
    async fn update_user(&self, id: &UserId, draft: &UserDraft) -> Result<Option<UserRecord>, UserError> {
        let url = self.endpoint(Some(id))?;
        debug!(%url, "PUT");
        let response = self
            .request(reqwest::Method::PUT, url)
            .json(draft)
            .send()
            .await?
            .error_for_status()?;
        Ok(stored_record(response).await)
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        let url = self.endpoint(Some(id))?;
        debug!(%url, "DELETE");
        self.request(reqwest::Method::DELETE, url)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::routing::{get, put};
    use axum::{Json, Router};
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    type Users = Arc<Mutex<Vec<UserRecord>>>;

    async fn list(State(users): State<Users>) -> Json<Vec<UserRecord>> {
        Json(users.lock().unwrap().clone())
    }

    async fn create(State(users): State<Users>, Json(draft): Json<UserDraft>) -> (StatusCode, Json<UserRecord>) {
        let mut users = users.lock().unwrap();
        let record = UserRecord::new(format!("u{}", users.len() + 1), draft.name, draft.email);
        users.push(record.clone());
        (StatusCode::CREATED, Json(record))
    }

    async fn update(
        State(users): State<Users>,
        Path(id): Path<String>,
        Json(draft): Json<UserDraft>,
    ) -> Result<Json<UserRecord>, StatusCode> {
        let mut users = users.lock().unwrap();
        let record = users
            .iter_mut()
            .find(|record| record.id.as_str() == id)
            .ok_or(StatusCode::NOT_FOUND)?;
        record.name = draft.name;
        record.email = draft.email;
        Ok(Json(record.clone()))
    }

    async fn delete(State(users): State<Users>, Path(id): Path<String>) -> StatusCode {
        let mut users = users.lock().unwrap();
        let before = users.len();
        users.retain(|record| record.id.as_str() != id);
        if users.len() == before { StatusCode::NOT_FOUND } else { StatusCode::OK }
    }

    /// Serves the users collection under `/api` on an ephemeral port.
    async fn serve(users: Users) -> Url {
        let app = Router::new()
            .route("/api/users", get(list).post(create))
            .route("/api/users/{id}", put(update).delete(delete))
            .with_state(users);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        Url::parse(&format!("http://{addr}/api/")).unwrap()
    }

    #[tokio::test]
    async fn test_crud_round_trip_against_http_service() {
        let users: Users = Arc::new(Mutex::new(vec![UserRecord::new(1, "John Doe", "john@example.com")]));
        let api = HttpUserApi::new(serve(users.clone()).await);

        let created = api.create_user(&UserDraft::new("Ann", "ann@x.com")).await.unwrap().unwrap();
        assert_eq!(created, UserRecord::new("u2", "Ann", "ann@x.com"));

        let updated = api
            .update_user(&created.id, &UserDraft::new("Anna", "anna@x.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Anna");

        api.delete_user(&UserId::from(1)).await.unwrap();

        let listed = api.fetch_users().await.unwrap();
        assert_eq!(listed, vec![UserRecord::new("u2", "Anna", "anna@x.com")]);
        assert_eq!(*users.lock().unwrap(), listed);
    }

    #[tokio::test]
    async fn test_created_without_body_is_still_accepted() {
        async fn create_quietly(State(users): State<Users>, Json(draft): Json<UserDraft>) -> StatusCode {
            users.lock().unwrap().push(UserRecord::new("q1", draft.name, draft.email));
            StatusCode::CREATED
        }

        let users: Users = Arc::default();
        let app = Router::new().route("/users", get(list).post(create_quietly)).with_state(users.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let api = HttpUserApi::new(Url::parse(&format!("http://{addr}")).unwrap());
        let created = api.create_user(&UserDraft::new("Ann", "ann@x.com")).await;
        assert_eq!(created, Ok(None));
        assert_eq!(users.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_error_status_is_a_network_failure() {
        let api = HttpUserApi::new(serve(Arc::default()).await);
        let result = api.delete_user(&UserId::from("missing")).await;
        assert!(matches!(result, Err(UserError::NetworkFailure(_))));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_a_network_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = HttpUserApi::new(Url::parse(&format!("http://{addr}")).unwrap());
        assert!(matches!(api.fetch_users().await, Err(UserError::NetworkFailure(_))));
    }

    #[test]
    fn test_endpoints_keep_base_path() {
        let api = HttpUserApi::new(Url::parse("http://localhost:5000").unwrap());
        assert_eq!(api.endpoint(None).unwrap().as_str(), "http://localhost:5000/users");
        assert_eq!(
            api.endpoint(Some(&UserId::from("a b"))).unwrap().as_str(),
            "http://localhost:5000/users/a%20b"
        );

        let nested = HttpUserApi::new(Url::parse("http://host/api/v1/").unwrap());
        assert_eq!(nested.endpoint(None).unwrap().as_str(), "http://host/api/v1/users");
    }
}
