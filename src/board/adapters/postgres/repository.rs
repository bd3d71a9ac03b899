//! `PostgreSQL` repository implementation for boards and memberships.

use super::{
    models::{BoardRow, MembershipRow},
    schema::{board_memberships, boards},
};
use crate::board::{
    domain::{
        Board, BoardCode, BoardId, BoardMembership, BoardStatus, MembershipId, MembershipRole,
        PersistedBoardData, PersistedMembershipData,
    },
    ports::{BoardRepository, BoardRepositoryError, BoardRepositoryResult},
};
use crate::identity::domain::UserId;
use crate::paging::{Page, PageRequest};
use crate::postgres::{
    PgPool, from_sql_count, get_conn_with, run_blocking_with, to_sql_count, violates_constraint,
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

const CODE_UNIQUE: &str = "idx_boards_code_unique";

/// `PostgreSQL`-backed board repository.
#[derive(Debug, Clone)]
pub struct PostgresBoardRepository {
    pool: PgPool,
}

impl PostgresBoardRepository {
    /// Creates a new repository from a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> BoardRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> BoardRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, BoardRepositoryError::persistence)?;
                f(&mut connection)
            },
            BoardRepositoryError::persistence,
        )
        .await
    }
}

impl From<DieselError> for BoardRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl BoardRepository for PostgresBoardRepository {
    async fn create_with_owners(
        &self,
        board: &Board,
        owners: &[BoardMembership],
    ) -> BoardRepositoryResult<()> {
        let board_row = to_board_row(board);
        let owner_rows: Vec<MembershipRow> = owners.iter().map(to_membership_row).collect();
        let code = board.code().clone();
        self.run_blocking(move |connection| {
            connection.transaction::<_, BoardRepositoryError, _>(|tx| {
                diesel::insert_into(boards::table)
                    .values(&board_row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                            if violates_constraint(info.as_ref(), CODE_UNIQUE) =>
                        {
                            BoardRepositoryError::DuplicateBoardCode(code.clone())
                        }
                        _ => BoardRepositoryError::persistence(err),
                    })?;
                for row in &owner_rows {
                    insert_membership(tx, row)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn update_board(&self, board: &Board) -> BoardRepositoryResult<()> {
        let row = to_board_row(board);
        let board_id = board.id();
        self.run_blocking(move |connection| {
            let updated = diesel::update(boards::table.filter(boards::id.eq(row.id)))
                .set(&row)
                .execute(connection)?;
            if updated == 0 {
                return Err(BoardRepositoryError::BoardNotFound(board_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_board(&self, id: BoardId) -> BoardRepositoryResult<Option<Board>> {
        self.run_blocking(move |connection| {
            let row = boards::table
                .filter(boards::id.eq(id.into_inner()))
                .select(BoardRow::as_select())
                .first::<BoardRow>(connection)
                .optional()?;
            row.map(row_to_board).transpose()
        })
        .await
    }

    async fn code_exists(&self, code: &BoardCode) -> BoardRepositoryResult<bool> {
        let lookup = code.as_str().to_owned();
        self.run_blocking(move |connection| {
            let found = diesel::select(diesel::dsl::exists(
                boards::table.filter(boards::code.eq(lookup)),
            ))
            .get_result::<bool>(connection)?;
            Ok(found)
        })
        .await
    }

    async fn list_boards_for_member(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> BoardRepositoryResult<Page<Board>> {
        let member = user_id.into_inner();
        self.run_blocking(move |connection| {
            let total = boards::table
                .inner_join(board_memberships::table)
                .filter(board_memberships::user_id.eq(member))
                .count()
                .get_result::<i64>(connection)?;
            let rows = boards::table
                .inner_join(board_memberships::table)
                .filter(board_memberships::user_id.eq(member))
                .order(boards::code.asc())
                .offset(to_sql_count(page.offset()))
                .limit(to_sql_count(page.limit()))
                .select(BoardRow::as_select())
                .load::<BoardRow>(connection)?;
            let items = rows
                .into_iter()
                .map(row_to_board)
                .collect::<BoardRepositoryResult<Vec<_>>>()?;
            Ok(Page::new(items, from_sql_count(total), page))
        })
        .await
    }

    async fn find_membership(
        &self,
        board_id: BoardId,
        user_id: UserId,
    ) -> BoardRepositoryResult<Option<BoardMembership>> {
        self.run_blocking(move |connection| {
            let row = board_memberships::table
                .filter(board_memberships::board_id.eq(board_id.into_inner()))
                .filter(board_memberships::user_id.eq(user_id.into_inner()))
                .select(MembershipRow::as_select())
                .first::<MembershipRow>(connection)
                .optional()?;
            row.map(row_to_membership).transpose()
        })
        .await
    }

    async fn memberships_for_board(
        &self,
        board_id: BoardId,
    ) -> BoardRepositoryResult<Vec<BoardMembership>> {
        self.run_blocking(move |connection| {
            let rows = board_memberships::table
                .filter(board_memberships::board_id.eq(board_id.into_inner()))
                .order((board_memberships::created_at.asc(), board_memberships::id.asc()))
                .select(MembershipRow::as_select())
                .load::<MembershipRow>(connection)?;
            rows.into_iter().map(row_to_membership).collect()
        })
        .await
    }

    async fn list_memberships(
        &self,
        board_id: BoardId,
        page: PageRequest,
    ) -> BoardRepositoryResult<Page<BoardMembership>> {
        let board = board_id.into_inner();
        self.run_blocking(move |connection| {
            let total = board_memberships::table
                .filter(board_memberships::board_id.eq(board))
                .count()
                .get_result::<i64>(connection)?;
            let rows = board_memberships::table
                .filter(board_memberships::board_id.eq(board))
                .order((board_memberships::created_at.asc(), board_memberships::id.asc()))
                .offset(to_sql_count(page.offset()))
                .limit(to_sql_count(page.limit()))
                .select(MembershipRow::as_select())
                .load::<MembershipRow>(connection)?;
            let items = rows
                .into_iter()
                .map(row_to_membership)
                .collect::<BoardRepositoryResult<Vec<_>>>()?;
            Ok(Page::new(items, from_sql_count(total), page))
        })
        .await
    }

    async fn add_membership(&self, membership: &BoardMembership) -> BoardRepositoryResult<()> {
        let row = to_membership_row(membership);
        self.run_blocking(move |connection| insert_membership(connection, &row))
            .await
    }

    async fn update_membership(&self, membership: &BoardMembership) -> BoardRepositoryResult<()> {
        let row = to_membership_row(membership);
        self.run_blocking(move |connection| update_membership_row(connection, &row))
            .await
    }

    async fn remove_membership(&self, id: MembershipId) -> BoardRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(
                board_memberships::table.filter(board_memberships::id.eq(id.into_inner())),
            )
            .execute(connection)?;
            if deleted == 0 {
                return Err(BoardRepositoryError::MembershipNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn count_owners(&self, board_id: BoardId) -> BoardRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let owners = board_memberships::table
                .filter(board_memberships::board_id.eq(board_id.into_inner()))
                .filter(board_memberships::role.eq(MembershipRole::Owner.as_str()))
                .count()
                .get_result::<i64>(connection)?;
            Ok(from_sql_count(owners))
        })
        .await
    }

    async fn apply_membership_changes(
        &self,
        inserts: &[BoardMembership],
        updates: &[BoardMembership],
    ) -> BoardRepositoryResult<()> {
        let insert_rows: Vec<MembershipRow> = inserts.iter().map(to_membership_row).collect();
        let update_rows: Vec<MembershipRow> = updates.iter().map(to_membership_row).collect();
        self.run_blocking(move |connection| {
            connection.transaction::<_, BoardRepositoryError, _>(|tx| {
                for row in &insert_rows {
                    insert_membership(tx, row)?;
                }
                for row in &update_rows {
                    update_membership_row(tx, row)?;
                }
                Ok(())
            })
        })
        .await
    }
}

fn insert_membership(
    connection: &mut PgConnection,
    row: &MembershipRow,
) -> BoardRepositoryResult<()> {
    diesel::insert_into(board_memberships::table)
        .values(row)
        .execute(connection)
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                BoardRepositoryError::DuplicateMembership {
                    board_id: BoardId::from_uuid(row.board_id),
                    user_id: UserId::from_uuid(row.user_id),
                }
            }
            _ => BoardRepositoryError::persistence(err),
        })?;
    Ok(())
}

fn update_membership_row(
    connection: &mut PgConnection,
    row: &MembershipRow,
) -> BoardRepositoryResult<()> {
    let updated = diesel::update(board_memberships::table.filter(board_memberships::id.eq(row.id)))
        .set(row)
        .execute(connection)?;
    if updated == 0 {
        return Err(BoardRepositoryError::MembershipNotFound(
            MembershipId::from_uuid(row.id),
        ));
    }
    Ok(())
}

fn to_board_row(board: &Board) -> BoardRow {
    BoardRow {
        id: board.id().into_inner(),
        code: board.code().as_str().to_owned(),
        name: board.name().to_owned(),
        description: board.description().to_owned(),
        created_by: board.created_by().into_inner(),
        status: board.status().as_str().to_owned(),
        created_at: board.created_at(),
        updated_at: board.updated_at(),
    }
}

fn row_to_board(row: BoardRow) -> BoardRepositoryResult<Board> {
    let code = BoardCode::new(&row.code).map_err(BoardRepositoryError::persistence)?;
    let status =
        BoardStatus::try_from(row.status.as_str()).map_err(BoardRepositoryError::persistence)?;
    Ok(Board::from_persisted(PersistedBoardData {
        id: BoardId::from_uuid(row.id),
        code,
        name: row.name,
        description: row.description,
        created_by: UserId::from_uuid(row.created_by),
        status,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn to_membership_row(membership: &BoardMembership) -> MembershipRow {
    MembershipRow {
        id: membership.id().into_inner(),
        board_id: membership.board_id().into_inner(),
        user_id: membership.user_id().into_inner(),
        role: membership.role().as_str().to_owned(),
        created_at: membership.created_at(),
        updated_at: membership.updated_at(),
    }
}

fn row_to_membership(row: MembershipRow) -> BoardRepositoryResult<BoardMembership> {
    let role =
        MembershipRole::try_from(row.role.as_str()).map_err(BoardRepositoryError::persistence)?;
    Ok(BoardMembership::from_persisted(PersistedMembershipData {
        id: MembershipId::from_uuid(row.id),
        board_id: BoardId::from_uuid(row.board_id),
        user_id: UserId::from_uuid(row.user_id),
        role,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
