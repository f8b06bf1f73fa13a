//! REST
//!
//! Client for the external exercise catalog and identity service. Requests are sent through
//! [`SendRequest`], which applies the configured timeout and maps transport failures to
//! storage errors.

use std::{collections::BTreeSet, time::Duration};

use log::debug;
use planner_domain as domain;
use reqwest::{
    Method, Request, Url,
    header::{AUTHORIZATION, HeaderValue},
};
use serde::de::DeserializeOwned;

use crate::dto::{Exercise, List, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl CatalogConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RESTError {
    #[error("invalid base URL \"{0}\"")]
    InvalidBaseURL(String),
    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

#[allow(async_fn_in_trait)]
pub trait SendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, domain::StorageError>;
}

pub struct ReqwestSendRequest {
    client: reqwest::Client,
}

impl ReqwestSendRequest {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }
}

impl SendRequest for ReqwestSendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, domain::StorageError> {
        let response = self.client.execute(request).await.map_err(storage_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(storage_error)?;
        Ok(Response { status, body })
    }
}

fn storage_error(err: reqwest::Error) -> domain::StorageError {
    if err.is_timeout() {
        domain::StorageError::Timeout
    } else if err.is_connect() {
        domain::StorageError::NoConnection
    } else {
        domain::StorageError::Other(Box::new(err))
    }
}

pub struct REST<S: SendRequest> {
    base_url: Url,
    pub sender: S,
}

impl REST<ReqwestSendRequest> {
    pub fn new(config: &CatalogConfig) -> Result<Self, RESTError> {
        Self::with_sender(&config.base_url, ReqwestSendRequest::new(config.timeout)?)
    }
}

impl<S: SendRequest> REST<S> {
    pub fn with_sender(base_url: &str, sender: S) -> Result<Self, RESTError> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url =
            Url::parse(&normalized).map_err(|_| RESTError::InvalidBaseURL(base_url.to_string()))?;
        Ok(Self { base_url, sender })
    }

    fn url(&self, path: &str) -> Result<Url, domain::StorageError> {
        self.base_url
            .join(path)
            .map_err(|err| domain::StorageError::Other(Box::new(err)))
    }

    async fn fetch<T: DeserializeOwned>(&self, request: Request) -> Result<T, domain::ReadError> {
        debug!("{} {}", request.method(), request.url());
        let response = self.sender.send_request(request).await?;
        match response.status {
            200..=299 => Ok(serde_json::from_str(&response.body)
                .map_err(|err| domain::StorageError::Other(Box::new(err)))?),
            404 => Err(domain::ReadError::NotFound),
            401 | 403 => Err(domain::StorageError::Unauthorized.into()),
            status => Err(domain::StorageError::Other(
                format!("unexpected response status {status}").into(),
            )
            .into()),
        }
    }

    async fn fetch_exercises(&self, url: Url) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        let exercises: List<Exercise> = self.fetch(Request::new(Method::GET, url)).await?;
        Ok(Vec::from(exercises)
            .into_iter()
            .map(domain::Exercise::from)
            .collect())
    }
}

impl<S: SendRequest> domain::ExerciseCatalog for REST<S> {
    async fn read_exercises_by_tag(
        &self,
        tag: domain::Tag,
        equipment: &domain::AllowedEquipment,
    ) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        let mut url = self.url("exercises")?;
        url.query_pairs_mut().append_pair("tag", tag.slug());
        if let Some(equipment) = equipment.to_query() {
            url.query_pairs_mut().append_pair("equipment", &equipment);
        }
        self.fetch_exercises(url).await
    }

    async fn read_exercise(
        &self,
        id: domain::ExerciseID,
    ) -> Result<domain::Exercise, domain::ReadError> {
        let exercise: Exercise = self
            .fetch(Request::new(
                Method::GET,
                self.url(&format!("exercises/{id}"))?,
            ))
            .await?;
        Ok(exercise.into())
    }

    async fn read_exercises_by_ids(
        &self,
        ids: &BTreeSet<domain::ExerciseID>,
    ) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let mut url = self.url("exercises")?;
        url.query_pairs_mut().append_pair(
            "ids",
            &ids.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
        );
        self.fetch_exercises(url).await
    }
}

impl<S: SendRequest> domain::IdentityRepository for REST<S> {
    async fn read_current_user(
        &self,
        token: &domain::Token,
    ) -> Result<domain::User, domain::ReadError> {
        let mut request = Request::new(Method::GET, self.url("auth/me")?);
        let authorization = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
            .map_err(|_| domain::StorageError::Unauthorized)?;
        request.headers_mut().insert(AUTHORIZATION, authorization);
        let user: User = self.fetch(request).await?;
        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use planner_domain::{ExerciseCatalog, IdentityRepository};

    use super::*;

    #[tokio::test]
    async fn test_read_exercises_by_tag() {
        let rest = rest_with_response(Ok(response(
            200,
            r#"{"data": [
                {"id": 2, "name": "Push-Up", "equipment": "body weight", "tags": ["horizontal_push"]},
                {"id": 1, "name": "Bench Press", "equipment": "barbell", "tags": ["horizontal_push"]}
            ]}"#,
        )));

        let exercises = rest
            .read_exercises_by_tag(
                domain::Tag::HorizontalPush,
                &domain::AllowedEquipment::only(&["body weight", "band"]),
            )
            .await
            .unwrap();

        assert_eq!(
            exercises
                .iter()
                .map(|e| (*e.id, e.name.as_str()))
                .collect::<Vec<_>>(),
            vec![(2, "Push-Up"), (1, "Bench Press")]
        );
        assert_eq!(
            rest.sender.request.borrow().clone(),
            Some((
                Method::GET,
                String::from(
                    "http://catalog.test/api/exercises?tag=horizontal_push&equipment=band%2Cbody+weight"
                ),
                None
            ))
        );
    }

    #[tokio::test]
    async fn test_read_exercises_by_tag_without_restriction() {
        let rest = rest_with_response(Ok(response(200, "[]")));

        assert_eq!(
            rest.read_exercises_by_tag(domain::Tag::Squat, &domain::AllowedEquipment::Any)
                .await
                .unwrap(),
            vec![]
        );
        assert_eq!(
            rest.sender.request.borrow().as_ref().map(|r| r.1.clone()),
            Some(String::from("http://catalog.test/api/exercises?tag=squat"))
        );
    }

    #[tokio::test]
    async fn test_read_exercise() {
        let rest = rest_with_response(Ok(response(
            200,
            r#"{"id": 42, "name": "Goblet Squat", "primary_muscle": "quads", "equipment": "Kettlebells"}"#,
        )));

        let exercise = rest.read_exercise(42.into()).await.unwrap();

        assert_eq!(exercise.name, "Goblet Squat");
        assert_eq!(exercise.equipment, domain::Equipment::new("kettlebell"));
        assert_eq!(
            rest.sender.request.borrow().as_ref().map(|r| r.1.clone()),
            Some(String::from("http://catalog.test/api/exercises/42"))
        );
    }

    #[tokio::test]
    async fn test_read_exercises_by_ids() {
        let rest = rest_with_response(Ok(response(200, "[]")));

        rest.read_exercises_by_ids(&BTreeSet::from([3.into(), 1.into()]))
            .await
            .unwrap();

        assert_eq!(
            rest.sender.request.borrow().as_ref().map(|r| r.1.clone()),
            Some(String::from("http://catalog.test/api/exercises?ids=1%2C3"))
        );
    }

    #[tokio::test]
    async fn test_read_exercises_by_no_ids() {
        let rest = rest_with_response(Err(domain::StorageError::NoConnection));

        assert_eq!(
            rest.read_exercises_by_ids(&BTreeSet::new()).await.unwrap(),
            vec![]
        );
        assert_eq!(*rest.sender.request.borrow(), None);
    }

    #[tokio::test]
    async fn test_read_current_user() {
        let rest = rest_with_response(Ok(response(
            200,
            r#"{"id": 5, "roles": ["member", "coach"]}"#,
        )));

        let user = rest
            .read_current_user(&domain::Token::new("Bearer abc"))
            .await
            .unwrap();

        assert_eq!(*user.id, 5);
        assert!(user.has_role(domain::Role::Coach));
        assert_eq!(
            rest.sender.request.borrow().clone(),
            Some((
                Method::GET,
                String::from("http://catalog.test/api/auth/me"),
                Some(String::from("Bearer abc"))
            ))
        );
    }

    #[rstest]
    #[case(404, "not found")]
    #[case(401, "unauthorized")]
    #[case(403, "unauthorized")]
    #[case(500, "unexpected response status 500")]
    #[case(200, "expected value at line 1 column 1")]
    #[tokio::test]
    async fn test_read_exercise_status(#[case] status: u16, #[case] message: &str) {
        let rest = rest_with_response(Ok(response(status, "<html>")));

        assert_eq!(
            rest.read_exercise(1.into()).await.unwrap_err().to_string(),
            message
        );
    }

    #[rstest]
    #[case(domain::StorageError::Timeout, "request timed out")]
    #[case(domain::StorageError::NoConnection, "no connection")]
    #[tokio::test]
    async fn test_read_exercise_transport_error(
        #[case] error: domain::StorageError,
        #[case] message: &str,
    ) {
        let rest = rest_with_response(Err(error));

        assert_eq!(
            rest.read_exercise(1.into()).await.unwrap_err().to_string(),
            message
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            REST::with_sender("not a url", MockSendRequest::default()),
            Err(RESTError::InvalidBaseURL(url)) if url == "not a url"
        ));
    }

    #[test]
    fn test_catalog_config_new() {
        assert_eq!(
            CatalogConfig::new("http://localhost"),
            CatalogConfig {
                base_url: String::from("http://localhost"),
                timeout: Duration::from_secs(10)
            }
        );
    }

    fn response(status: u16, body: &str) -> Response {
        Response {
            status,
            body: body.to_string(),
        }
    }

    fn rest_with_response(
        response: Result<Response, domain::StorageError>,
    ) -> REST<MockSendRequest> {
        let sender = MockSendRequest {
            request: RefCell::new(None),
            response: RefCell::new(Some(response)),
        };
        REST::with_sender("http://catalog.test/api", sender).unwrap()
    }

    type RecordedRequest = (Method, String, Option<String>);

    #[derive(Default)]
    struct MockSendRequest {
        request: RefCell<Option<RecordedRequest>>,
        response: RefCell<Option<Result<Response, domain::StorageError>>>,
    }

    impl SendRequest for MockSendRequest {
        async fn send_request(&self, request: Request) -> Result<Response, domain::StorageError> {
            *self.request.borrow_mut() = Some((
                request.method().clone(),
                request.url().to_string(),
                request
                    .headers()
                    .get(AUTHORIZATION)
                    .map(|v| v.to_str().unwrap().to_string()),
            ));
            (*self.response.borrow_mut())
                .take()
                .unwrap_or(Err(domain::StorageError::Other("no response".into())))
        }
    }
}
