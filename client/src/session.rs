//! Async session client: `build_* → Transport::execute → parse_*`.
//!
//! # Design
//! The sans-IO `DiaClient` sits behind a `std::sync::Mutex` that is locked
//! only to build a request or to parse a response, never across an
//! `.await`. Calls may therefore run concurrently through `&self`; nothing
//! is queued or de-duplicated, and racing logins resolve in whichever
//! order their responses are parsed.

use std::sync::{Mutex, MutexGuard, PoisonError};

use dia_core::{
    ApiResponse, ClientConfig, Context, DiaClient, DiaError, HttpRequest, HttpResponse, ListQuery,
    NewReservation, Operation, ReservationUpdate,
};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::transport::{ReqwestTransport, Transport};

type Result<T> = std::result::Result<T, DiaError>;

/// Session-tracking DIA client over an async [`Transport`].
pub struct SessionClient<T = ReqwestTransport> {
    core: Mutex<DiaClient>,
    transport: T,
}

impl SessionClient<ReqwestTransport> {
    /// Client over a fresh `reqwest` connection pool.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(config, ReqwestTransport::new()?))
    }
}

impl<T: Transport> SessionClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            core: Mutex::new(DiaClient::new(config)),
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> ClientConfig {
        self.core().config().clone()
    }

    /// Current session token and tenant scoping.
    pub fn context(&self) -> Context {
        self.core().context()
    }

    pub fn is_authenticated(&self) -> bool {
        self.core().is_authenticated()
    }

    /// Open a session, replacing any token already held.
    ///
    /// Transport failures are reported as `Authentication`.
    pub async fn login(&self) -> Result<String> {
        let request = self.core().build_login()?;
        let parsed = match self.send(Operation::Login, request).await {
            Ok(response) => self.core().parse_login(response),
            Err(e) => Err(e.into_authentication()),
        };
        match parsed {
            Ok(token) => {
                info!("DIA login successful");
                Ok(token)
            }
            Err(e) => {
                error!(error = %e, "DIA login failed");
                Err(e)
            }
        }
    }

    /// Close the session. Returns `false` without any I/O when there is none.
    pub async fn logout(&self) -> Result<bool> {
        let request = self.core().build_logout()?;
        let Some(request) = request else {
            warn!("no active DIA session, nothing to logout");
            return Ok(false);
        };
        let response = self.send(Operation::Logout, request).await?;
        let parsed = self.core().parse_logout(response);
        match &parsed {
            Ok(_) => info!("DIA logout successful"),
            Err(e) => error!(error = %e, "DIA logout failed"),
        }
        parsed
    }

    pub async fn list_salons(&self, query: &ListQuery) -> Result<ApiResponse> {
        self.dispatch(
            Operation::ListSalons,
            |c| c.build_list_salons(query),
            DiaClient::parse_list_salons,
        )
        .await
    }

    /// Fetch one salon; `params` defaults to `""`.
    pub async fn get_salon(&self, key: u64, params: Option<&Value>) -> Result<ApiResponse> {
        self.dispatch(
            Operation::GetSalon,
            |c| c.build_get_salon(key, params),
            DiaClient::parse_get_salon,
        )
        .await
    }

    /// Create a reservation; the response carries the server-assigned key.
    pub async fn add_reservation(&self, reservation: &NewReservation) -> Result<ApiResponse> {
        self.dispatch(
            Operation::AddReservation,
            |c| c.build_add_reservation(reservation),
            DiaClient::parse_add_reservation,
        )
        .await
    }

    pub async fn update_reservation(&self, update: &ReservationUpdate) -> Result<ApiResponse> {
        self.dispatch(
            Operation::UpdateReservation,
            |c| c.build_update_reservation(update),
            DiaClient::parse_update_reservation,
        )
        .await
    }

    pub async fn delete_reservation(&self, key: u64, params: Option<&Value>) -> Result<ApiResponse> {
        self.dispatch(
            Operation::DeleteReservation,
            |c| c.build_delete_reservation(key, params),
            DiaClient::parse_delete_reservation,
        )
        .await
    }

    pub async fn list_reservations(&self, query: &ListQuery) -> Result<ApiResponse> {
        self.dispatch(
            Operation::ListReservations,
            |c| c.build_list_reservations(query),
            DiaClient::parse_list_reservations,
        )
        .await
    }

    async fn dispatch<B, P>(&self, operation: Operation, build: B, parse: P) -> Result<ApiResponse>
    where
        B: FnOnce(&DiaClient) -> Result<HttpRequest>,
        P: FnOnce(&DiaClient, HttpResponse) -> Result<ApiResponse>,
    {
        let request = build(&*self.core());
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                error!(%operation, error = %e, "DIA request not sent");
                return Err(e);
            }
        };
        let response = self.send(operation, request).await?;
        let parsed = parse(&*self.core(), response);
        if let Err(e) = &parsed {
            error!(%operation, error = %e, "DIA call failed");
        }
        parsed
    }

    async fn send(&self, operation: Operation, request: HttpRequest) -> Result<HttpResponse> {
        debug!(%operation, url = %request.url, "dispatching DIA request");
        let response = self.transport.execute(request).await;
        match &response {
            Ok(resp) => debug!(%operation, status = resp.status, "DIA response received"),
            Err(e) => error!(%operation, error = %e, "DIA transport failure"),
        }
        response
    }

    fn core(&self) -> MutexGuard<'_, DiaClient> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
