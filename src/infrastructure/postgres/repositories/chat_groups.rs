use anyhow::Result;
use axum::async_trait;
use diesel::{insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::chat_groups::InsertChatGroupMemberEntity,
        repositories::chat_groups::ChatGroupRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{chat_group_members, chat_groups},
    },
};

pub struct ChatGroupPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ChatGroupPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ChatGroupRepository for ChatGroupPostgres {
    async fn add_member_to_mess_groups(&self, mess_id: Uuid, user_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let group_ids = chat_groups::table
            .filter(chat_groups::mess_id.eq(mess_id))
            .filter(chat_groups::is_default.eq(true))
            .select(chat_groups::id)
            .load::<Uuid>(&mut conn)?;

        if group_ids.is_empty() {
            return Ok(0);
        }

        let rows: Vec<InsertChatGroupMemberEntity> = group_ids
            .into_iter()
            .map(|group_id| InsertChatGroupMemberEntity { group_id, user_id })
            .collect();

        let inserted = insert_into(chat_group_members::table)
            .values(&rows)
            .on_conflict_do_nothing()
            .execute(&mut conn)?;

        Ok(inserted)
    }
}
