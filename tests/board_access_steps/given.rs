//! Given steps for board access BDD scenarios.

use super::world::{BoardWorld, run_async};
use eyre::WrapErr;
use helpdesk::board::{
    domain::MembershipRole,
    services::{CreateBoardRequest, CreateMembershipRequest},
};
use helpdesk::context::RequestContext;
use helpdesk::identity::{
    domain::{AssignableRole, EmailAddress, NewUser, User, UserRole},
    ports::UserRepository,
    services::CreateUserRequest,
};
use helpdesk::ticket::services::CreateTicketRequest;
use mockable::DefaultClock;
use rstest_bdd_macros::given;

/// Creates an account on behalf of the board creator.
fn hire(world: &mut BoardWorld, name: &str, role: AssignableRole) -> Result<User, eyre::Report> {
    let creator = world.as_board_creator()?;
    let request = CreateUserRequest::new(format!("{name}@example.com"), "secret", name, role);
    let user = run_async(world.accounts.create_user(&creator, request))
        .wrap_err_with(|| format!("create account for '{name}'"))?;
    world.people.insert(name.to_owned(), user.clone());
    Ok(user)
}

#[given(r#"an admin "{name}" who owns board "{code}""#)]
fn admin_owns_board(world: &mut BoardWorld, name: String, code: String) -> Result<(), eyre::Report> {
    let admin = User::new(
        NewUser {
            email: EmailAddress::new(format!("{name}@example.com"))?,
            password_hash: "$argon2id$scenario".to_owned(),
            full_name: name.clone(),
            role: UserRole::Admin,
        },
        &DefaultClock,
    )?;
    run_async(world.users.store(&admin)).wrap_err("store scenario admin")?;
    let ctx = RequestContext::new(admin.id());
    world.people.insert(name, admin);

    let board = run_async(
        world
            .boards
            .create_board(&ctx, CreateBoardRequest::new(code, "Support", "")),
    )
    .wrap_err("create scenario board")?;
    world.board = Some(board);
    Ok(())
}

#[given(r#"an outsider customer "{name}""#)]
fn outsider_customer(world: &mut BoardWorld, name: String) -> Result<(), eyre::Report> {
    hire(world, &name, AssignableRole::Customer)?;
    Ok(())
}

#[given(r#"member "{name}" is a {global} with board role "{role}""#)]
fn board_member(
    world: &mut BoardWorld,
    name: String,
    global: String,
    role: String,
) -> Result<(), eyre::Report> {
    let assignable = match global.as_str() {
        "customer" => AssignableRole::Customer,
        "agent" => AssignableRole::Agent,
        "admin" => AssignableRole::Admin,
        other => return Err(eyre::eyre!("unsupported global role '{other}'")),
    };
    let membership_role = MembershipRole::try_from(role.as_str())?;
    let user = hire(world, &name, assignable)?;

    let board_id = world.current_board()?.id();
    let creator = world.as_board_creator()?;
    run_async(world.boards.create_membership(
        &creator,
        board_id,
        CreateMembershipRequest::new(user.id(), membership_role),
    ))
    .wrap_err_with(|| format!("grant '{role}' to '{name}'"))?;
    Ok(())
}

#[given(r#"an existing ticket "{title}" on the board"#)]
fn existing_ticket(world: &mut BoardWorld, title: String) -> Result<(), eyre::Report> {
    let board_id = world.current_board()?.id();
    let creator = world.as_board_creator()?;
    let ticket = run_async(
        world
            .tickets
            .create_ticket(&creator, board_id, CreateTicketRequest::new(title)),
    )
    .wrap_err("create scenario ticket")?;
    world.ticket = Some(ticket);
    Ok(())
}
