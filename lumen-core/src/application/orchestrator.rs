use crate::application::handshake::AuthHandshakeClient;
use crate::application::lifecycle::FlowObserver;
use crate::application::poller::FlowStatusPoller;
use crate::application::registry::FlowRegistry;
use crate::application::session::WalletSession;
use crate::domain::asset::{resolve_deposit_asset, DepositAsset, Leg, Route};
use crate::domain::flow::{FlowKind, FlowRecord, InteractiveOpen};
use crate::foundation::constants::INITIAL_DEPOSIT_STATUS;
use crate::foundation::util::time::now_nanos;
use crate::foundation::{AccountId, AnchorDomain, AnchorError, FlowId, Result};
use crate::infrastructure::anchor::{AnchorApi, InitiateDepositParams, TrustlineOracle};
use crate::infrastructure::launcher::InteractiveLauncher;
use log::{debug, info, warn};
use std::sync::Arc;

/// What a caller asks to deposit: which anchor, how much, and the route
/// context the asset is resolved from.
#[derive(Clone, Debug)]
pub struct DepositIntent {
    pub anchor_domain: AnchorDomain,
    pub amount: String,
    /// Structured leg detail when the route carries one.
    pub leg: Option<Leg>,
    pub route: Route,
}

/// A successfully launched flow: the registered record plus the outcome of
/// the best-effort window open. The url is always retrievable here whether or
/// not the open succeeded.
#[derive(Clone, Debug)]
pub struct LaunchedFlow {
    pub record: FlowRecord,
    pub interactive: InteractiveOpen,
}

/// Drives one deposit launch end to end: asset resolution, handshake,
/// initiation, registration, poll handoff.
///
/// Launching twice creates two independent flows; no deduplication by asset
/// or amount is performed.
pub struct DepositFlowOrchestrator {
    session: Arc<WalletSession>,
    handshake: AuthHandshakeClient,
    api: Arc<dyn AnchorApi>,
    trustlines: Option<Arc<dyn TrustlineOracle>>,
    launcher: Arc<dyn InteractiveLauncher>,
    registry: FlowRegistry,
    poller: FlowStatusPoller,
    observer: Arc<dyn FlowObserver>,
}

impl DepositFlowOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session: Arc<WalletSession>,
        api: Arc<dyn AnchorApi>,
        trustlines: Option<Arc<dyn TrustlineOracle>>,
        launcher: Arc<dyn InteractiveLauncher>,
        registry: FlowRegistry,
        poller: FlowStatusPoller,
        observer: Arc<dyn FlowObserver>,
    ) -> Self {
        Self { session, handshake: AuthHandshakeClient::new(api.clone()), api, trustlines, launcher, registry, poller, observer }
    }

    pub fn registry(&self) -> &FlowRegistry {
        &self.registry
    }

    pub async fn launch(&self, intent: &DepositIntent) -> Result<LaunchedFlow> {
        let account = self.session.require_signing_identity()?;
        let asset = resolve_deposit_asset(intent.leg.as_ref(), &intent.route)?;
        info!(
            "deposit launch started anchor_domain={} account={} asset={} amount={}",
            intent.anchor_domain,
            account,
            asset.key_string(),
            intent.amount
        );

        self.advise_trustline(&account, &asset, &intent.route).await;

        let token = self.handshake.authenticate(&self.session, &intent.anchor_domain).await?;
        token.ensure_scope(&intent.anchor_domain, &account)?;

        let params = InitiateDepositParams {
            asset_code: asset.code.clone(),
            asset_issuer: asset.issuer.clone(),
            amount: intent.amount.clone(),
            account: account.clone(),
        };
        let initiation = self
            .api
            .initiate_deposit(&intent.anchor_domain, &token, &params)
            .await
            .map_err(|err| AnchorError::launch_aborted("deposit_initiation", err.to_string()))?;
        if initiation.interactive_url.trim().is_empty() {
            return Err(AnchorError::NoInteractiveUrl { anchor_domain: intent.anchor_domain.to_string() });
        }

        // Best effort only: a blocked window is not a failure, the url goes
        // back to the caller for manual opening.
        let opened = self.launcher.open(&initiation.interactive_url);
        if !opened {
            info!("interactive window blocked, url returned to caller flow_id={}", initiation.id);
        }

        let record = FlowRecord {
            id: initiation.id.clone(),
            kind: FlowKind::Deposit,
            asset,
            amount: intent.amount.clone(),
            anchor_domain: intent.anchor_domain.clone(),
            interactive_url: initiation.interactive_url.clone(),
            auth_token: token,
            status: INITIAL_DEPOSIT_STATUS.to_string(),
            started_at_nanos: now_nanos(),
        };
        self.registry.insert(record.clone())?;
        self.observer.on_flow_launched(&record);
        self.poller.track(record.id.clone());
        info!("deposit flow registered flow_id={} anchor_domain={}", record.id, record.anchor_domain);

        Ok(LaunchedFlow { record, interactive: InteractiveOpen { opened, url: initiation.interactive_url } })
    }

    /// User dismissal: removes the flow and stops its polling synchronously.
    pub fn dismiss(&self, id: &FlowId) -> bool {
        let removed = self.registry.dismiss(id);
        if removed {
            info!("flow dismissed flow_id={}", id);
            self.observer.on_flow_dismissed(id);
        }
        removed
    }

    /// Advisory check: can the account receive a non-native deposit asset?
    /// Routes that already pass through the native asset skip it. Failure is
    /// logged and dropped; this never blocks the launch.
    async fn advise_trustline(&self, account: &AccountId, asset: &DepositAsset, route: &Route) {
        if asset.is_native || route.passes_through_native() {
            return;
        }
        let Some(oracle) = &self.trustlines else {
            return;
        };
        match oracle.missing_trustlines(account, &[asset.key_string()]).await {
            Ok(missing) if !missing.is_empty() => {
                warn!("trustline advisory account={} missing={:?}", account, missing);
                self.observer.on_trustline_missing(account, &missing);
            }
            Ok(_) => {}
            Err(err) => {
                debug!("trustline advisory check failed, ignoring error={}", err);
            }
        }
    }
}
