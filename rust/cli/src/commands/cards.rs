use crate::error::CliError;
use crate::ui;
use std::io::Write;
use tarot_engine::query::{self, ListParams, ListRequest};
use tarot_engine::CardStore;

pub fn handle_card_command(
    store: &dyn CardStore,
    id: i64,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let card = query::get_card(store, id)?;
    ui::write_json(out, &card)?;
    Ok(())
}

/// Same validation and defaults as `GET /cards`.
pub fn handle_list_command(
    store: &dyn CardStore,
    params: ListParams,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let request = ListRequest::from_params(params)?;
    let list = query::list_cards(store, &request)?;
    ui::write_json(out, &list)?;
    Ok(())
}
