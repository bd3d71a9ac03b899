//! Then steps for board access BDD scenarios.

use super::world::BoardWorld;
use helpdesk::board::domain::BoardStatus;
use helpdesk::error::ErrorKind;
use rstest_bdd_macros::then;

#[then("the request is denied")]
fn request_denied(world: &BoardWorld) -> Result<(), eyre::Report> {
    let kind = world.last_error_kind()?;
    eyre::ensure!(
        kind == ErrorKind::PermissionDenied,
        "expected permission denied, got {kind:?}"
    );
    Ok(())
}

#[then("the request fails with invalid state")]
fn request_invalid_state(world: &BoardWorld) -> Result<(), eyre::Report> {
    let kind = world.last_error_kind()?;
    eyre::ensure!(
        kind == ErrorKind::InvalidState,
        "expected invalid state, got {kind:?}"
    );
    Ok(())
}

#[then(r#"the ticket is numbered "{code}""#)]
fn ticket_numbered(world: &BoardWorld, code: String) -> Result<(), eyre::Report> {
    let board = world.current_board()?;
    let ticket = world
        .ticket
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no ticket was created"))?;
    let actual = ticket.number().code_on(board.code());
    eyre::ensure!(actual == code, "expected ticket {code}, found {actual}");
    Ok(())
}

#[then(r#""{name}" is the reporter"#)]
fn reporter_is(world: &BoardWorld, name: String) -> Result<(), eyre::Report> {
    let expected = world.person(&name)?.id();
    let ticket = world
        .ticket
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no ticket was created"))?;
    eyre::ensure!(
        ticket.reporter_id() == expected,
        "reporter should be '{name}'"
    );
    Ok(())
}

#[then("the ticket has no assignee")]
fn ticket_unassigned(world: &BoardWorld) -> Result<(), eyre::Report> {
    let ticket = world
        .ticket
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no ticket in scenario world"))?;
    eyre::ensure!(ticket.assignee_id().is_none(), "ticket should stay unassigned");
    Ok(())
}

#[then("the board is inactive")]
fn board_inactive(world: &BoardWorld) -> Result<(), eyre::Report> {
    let last = world
        .deactivations
        .last()
        .ok_or_else(|| eyre::eyre!("board was never deactivated"))?;
    eyre::ensure!(
        last.status() == BoardStatus::Inactive,
        "board should be inactive"
    );
    Ok(())
}

#[then("the second deactivation changed nothing")]
fn second_deactivation_noop(world: &BoardWorld) -> Result<(), eyre::Report> {
    let [first, second] = world.deactivations.as_slice() else {
        return Err(eyre::eyre!(
            "expected two deactivations, found {}",
            world.deactivations.len()
        ));
    };
    eyre::ensure!(
        first.updated_at() == second.updated_at(),
        "repeated deactivation should not touch the board"
    );
    Ok(())
}
