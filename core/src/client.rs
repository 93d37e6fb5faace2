//! Sans-IO request builder and response parser for the DIA web service.
//!
//! # Design
//! `DiaClient` owns the validated configuration and the session token.
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`; the
//! host executes the HTTP round-trip in between. Session-scoped builders
//! refuse to produce a request without a session, so a precondition failure
//! can never reach the network.
//!
//! Only `parse_login` and `parse_logout` mutate state.

use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{DiaError, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::protocol::{
    self, Card, Keyed, LoginParams, LoginPayload, LogoutPayload, NewReservationCard, Operation,
    Reply, ReservationUpdateCard, Scoped, LOGIN_LANG, NO_SESSION_RETURNED, UNKNOWN_ERROR,
};
use crate::types::{ApiResponse, Context, ListQuery, NewReservation, ReservationUpdate};

/// Stateful, I/O-free client for one DIA tenant/period.
#[derive(Debug, Clone)]
pub struct DiaClient {
    config: ClientConfig,
    session_id: Option<String>,
}

impl DiaClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            session_id: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session_id.is_some()
    }

    pub fn context(&self) -> Context {
        Context {
            session_id: self.session_id.clone(),
            firma_kodu: self.config.firma_kodu(),
            donem_kodu: self.config.donem_kodu(),
        }
    }

    // -----------------------------------------------------------------------
    // Session
    // -----------------------------------------------------------------------

    pub fn build_login(&self) -> Result<HttpRequest> {
        let payload = LoginPayload {
            username: self.config.username(),
            password: self.config.password(),
            params: LoginParams {
                apikey: self.config.api_key(),
            },
            disconnect_same_user: true,
            lang: LOGIN_LANG,
        };
        self.request(Operation::Login, &payload)
    }

    /// Store and return the session token carried in `msg`.
    pub fn parse_login(&mut self, response: HttpResponse) -> Result<String> {
        let reply = protocol::decode_reply(&response.body).map_err(DiaError::into_authentication)?;
        match reply {
            Reply::Success(body) => match body.get("msg").and_then(Value::as_str) {
                Some(token) if !token.is_empty() => {
                    self.session_id = Some(token.to_string());
                    Ok(token.to_string())
                }
                _ => Err(DiaError::Authentication(NO_SESSION_RETURNED.to_string())),
            },
            Reply::Failure(msg) => Err(DiaError::Authentication(
                msg.unwrap_or_else(|| NO_SESSION_RETURNED.to_string()),
            )),
        }
    }

    /// `None` when there is no session to close.
    pub fn build_logout(&self) -> Result<Option<HttpRequest>> {
        match self.session_id.as_deref() {
            None => Ok(None),
            Some(session_id) => self
                .request(Operation::Logout, &LogoutPayload { session_id })
                .map(Some),
        }
    }

    pub fn parse_logout(&mut self, response: HttpResponse) -> Result<bool> {
        match protocol::decode_reply(&response.body)? {
            Reply::Success(_) => {
                self.session_id = None;
                Ok(true)
            }
            Reply::Failure(msg) => Err(DiaError::Session(
                msg.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            )),
        }
    }

    // -----------------------------------------------------------------------
    // Salons
    // -----------------------------------------------------------------------

    pub fn build_list_salons(&self, query: &ListQuery) -> Result<HttpRequest> {
        self.scoped(Operation::ListSalons, query)
    }

    pub fn parse_list_salons(&self, response: HttpResponse) -> Result<ApiResponse> {
        parse_scoped(Operation::ListSalons, response)
    }

    /// `params` defaults to `""` when `None`.
    pub fn build_get_salon(&self, key: u64, params: Option<&Value>) -> Result<HttpRequest> {
        let empty = Value::String(String::new());
        let params = params.unwrap_or(&empty);
        self.scoped(Operation::GetSalon, Keyed { key, params })
    }

    pub fn parse_get_salon(&self, response: HttpResponse) -> Result<ApiResponse> {
        parse_scoped(Operation::GetSalon, response)
    }

    // -----------------------------------------------------------------------
    // Reservations
    // -----------------------------------------------------------------------

    pub fn build_add_reservation(&self, reservation: &NewReservation) -> Result<HttpRequest> {
        let kart = NewReservationCard::from(reservation);
        self.scoped(Operation::AddReservation, Card { kart })
    }

    pub fn parse_add_reservation(&self, response: HttpResponse) -> Result<ApiResponse> {
        parse_scoped(Operation::AddReservation, response)
    }

    pub fn build_update_reservation(&self, update: &ReservationUpdate) -> Result<HttpRequest> {
        let kart = ReservationUpdateCard::from(update);
        self.scoped(Operation::UpdateReservation, Card { kart })
    }

    pub fn parse_update_reservation(&self, response: HttpResponse) -> Result<ApiResponse> {
        parse_scoped(Operation::UpdateReservation, response)
    }

    /// The key is sent as its decimal string.
    pub fn build_delete_reservation(&self, key: u64, params: Option<&Value>) -> Result<HttpRequest> {
        let empty = Value::String(String::new());
        let params = params.unwrap_or(&empty);
        self.scoped(
            Operation::DeleteReservation,
            Keyed {
                key: key.to_string(),
                params,
            },
        )
    }

    pub fn parse_delete_reservation(&self, response: HttpResponse) -> Result<ApiResponse> {
        parse_scoped(Operation::DeleteReservation, response)
    }

    pub fn build_list_reservations(&self, query: &ListQuery) -> Result<HttpRequest> {
        self.scoped(Operation::ListReservations, query)
    }

    pub fn parse_list_reservations(&self, response: HttpResponse) -> Result<ApiResponse> {
        parse_scoped(Operation::ListReservations, response)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn scoped<P: Serialize>(&self, operation: Operation, fields: P) -> Result<HttpRequest> {
        let session_id = self
            .session_id
            .as_deref()
            .ok_or(DiaError::Precondition { operation })?;
        let payload = Scoped {
            session_id,
            firma_kodu: self.config.firma_kodu(),
            donem_kodu: self.config.donem_kodu(),
            fields,
        };
        self.request(operation, &payload)
    }

    fn request<P: Serialize>(&self, operation: Operation, payload: &P) -> Result<HttpRequest> {
        let body = protocol::envelope(operation, payload)?;
        let url = format!("{}{}", self.config.base_url(), operation.path());
        Ok(HttpRequest::json_post(url, body))
    }
}

/// Map a non-`"200"` reply of a session-scoped call to `DiaError::Request`.
fn parse_scoped(operation: Operation, response: HttpResponse) -> Result<ApiResponse> {
    match protocol::decode_reply(&response.body)? {
        Reply::Success(body) => Ok(ApiResponse::new(body)),
        Reply::Failure(msg) => Err(DiaError::Request {
            operation,
            message: msg.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        }),
    }
}
