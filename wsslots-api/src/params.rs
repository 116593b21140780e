//! Parameter parsing for `action=editslots`.

use crate::error::{ApiError, ApiResult};
use std::collections::HashMap;
use wsslots_edit::EditRequest;
use wsslots_model::SlotRegistry;
use wsslots_types::{ActorId, Page, PageId, SlotRole, SlotUpdates, Title, WatchlistPref};

/// Prefix that turns a slot role into its request parameter name.
pub const SLOT_PARAM_PREFIX: &str = "slot_";

/// The request parameter carrying content for `role`.
pub fn slot_param_name(role: &SlotRole) -> String {
    format!("{SLOT_PARAM_PREFIX}{role}")
}

/// How the request names its page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRef {
    Title(Title),
    Id(PageId),
}

/// Validated `editslots` parameters, before page resolution.
#[derive(Debug, Clone)]
pub struct EditSlotsParams {
    pub page: PageRef,
    pub slot_updates: SlotUpdates,
    pub summary: String,
    pub append: bool,
    pub prepend: bool,
    pub watchlist: WatchlistPref,
    pub bot: bool,
    pub minor: bool,
    pub createonly: bool,
    pub nocreate: bool,
}

impl EditSlotsParams {
    /// Parses request parameters. Only `slot_` parameters of roles the
    /// registry knows are collected; others are ignored.
    pub fn parse(params: &HashMap<String, String>, registry: &dyn SlotRegistry) -> ApiResult<Self> {
        let page = match (params.get("title"), params.get("pageid")) {
            (Some(_), Some(_)) => return Err(ApiError::InvalidParamMix("title", "pageid")),
            (None, None) => {
                return Err(ApiError::MissingParam(
                    "One of the parameters \"title\" and \"pageid\" is required.".to_string(),
                ));
            }
            (Some(raw), None) => {
                PageRef::Title(Title::new(raw).map_err(|_| ApiError::InvalidTitle(raw.clone()))?)
            }
            (None, Some(raw)) => PageRef::Id(parse_page_id(raw)?),
        };

        let watchlist = match params.get("watchlist") {
            None => WatchlistPref::NoChange,
            Some(raw) => raw.parse().map_err(|_| ApiError::BadValue {
                param: "watchlist",
                value: raw.clone(),
            })?,
        };

        let slot_updates = registry
            .known_roles()
            .into_iter()
            .filter_map(|role| {
                params
                    .get(&slot_param_name(&role))
                    .map(|content| (role, content.clone()))
            })
            .collect();

        Ok(Self {
            page,
            slot_updates,
            summary: params.get("summary").cloned().unwrap_or_default(),
            append: flag(params, "append"),
            prepend: flag(params, "prepend"),
            watchlist,
            bot: flag(params, "bot"),
            minor: flag(params, "minor"),
            createonly: flag(params, "createonly"),
            nocreate: flag(params, "nocreate"),
        })
    }

    /// Turns the parameters into a coordinator request for a resolved page.
    pub fn into_request(self, actor: ActorId, page: Page) -> EditRequest {
        EditRequest {
            actor,
            page,
            slot_updates: self.slot_updates,
            summary: self.summary,
            append: self.append,
            prepend: self.prepend,
            watchlist: self.watchlist,
            bot: self.bot,
            minor: self.minor,
            createonly: self.createonly,
            nocreate: self.nocreate,
        }
    }
}

/// Boolean parameters are true when present, whatever their value.
fn flag(params: &HashMap<String, String>, name: &str) -> bool {
    params.contains_key(name)
}

fn parse_page_id(raw: &str) -> ApiResult<PageId> {
    let value: u64 = raw.trim().parse().map_err(|_| ApiError::BadInteger {
        param: "pageid",
        value: raw.to_string(),
    })?;
    PageId::new(value).map_err(|_| ApiError::NoSuchPageId(raw.to_string()))
}
