//! When steps for board access BDD scenarios.

use super::world::{BoardWorld, run_async};
use helpdesk::ticket::services::{CreateTicketRequest, UpdateTicketRequest};
use rstest_bdd_macros::when;

#[when(r#""{name}" creates ticket "{title}" on the board"#)]
fn create_ticket(world: &mut BoardWorld, name: String, title: String) -> Result<(), eyre::Report> {
    let ctx = world.as_person(&name)?;
    let board_id = world.current_board()?.id();
    match run_async(
        world
            .tickets
            .create_ticket(&ctx, board_id, CreateTicketRequest::new(title)),
    ) {
        Ok(ticket) => world.ticket = Some(ticket),
        Err(err) => world.last_error = Some(err),
    }
    Ok(())
}

#[when(r#""{name}" deactivates the board twice"#)]
fn deactivate_twice(world: &mut BoardWorld, name: String) -> Result<(), eyre::Report> {
    let ctx = world.as_person(&name)?;
    let board_id = world.current_board()?.id();
    for _ in 0..2 {
        let board = run_async(world.boards.deactivate_board(&ctx, board_id))
            .map_err(|err| eyre::eyre!("deactivation failed: {err}"))?;
        world.deactivations.push(board);
    }
    Ok(())
}

#[when(r#""{name}" assigns the ticket to "{assignee}""#)]
fn assign_ticket(world: &mut BoardWorld, name: String, assignee: String) -> Result<(), eyre::Report> {
    let ctx = world.as_person(&name)?;
    let target = world.person(&assignee)?.id();
    let board_id = world.current_board()?.id();
    let ticket_id = world
        .ticket
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no ticket in scenario world"))?
        .id();
    let request = UpdateTicketRequest::new().assign_to(target);
    match run_async(
        world
            .tickets
            .update_ticket(&ctx, board_id, ticket_id, request),
    ) {
        Ok(ticket) => world.ticket = Some(ticket),
        Err(err) => world.last_error = Some(err),
    }
    Ok(())
}

#[when(r#""{name}" removes "{target}" from the board"#)]
fn remove_member(world: &mut BoardWorld, name: String, target: String) -> Result<(), eyre::Report> {
    let ctx = world.as_person(&name)?;
    let user_id = world.person(&target)?.id();
    let board_id = world.current_board()?.id();
    if let Err(err) = run_async(world.boards.remove_membership(&ctx, board_id, user_id)) {
        world.last_error = Some(err);
    }
    Ok(())
}
