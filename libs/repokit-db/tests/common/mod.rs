#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

//! Entities, hooks and fixtures shared by the integration suites.
//!
//! Every suite runs against its own in-memory `SQLite` database.

use repokit_db::{ConnectOpts, DbHandle, RepositoryHooks};
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, QueryFilter, QueryOrder, Select,
};

pub mod news {
    use sea_orm::entity::prelude::*;

    #[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "news")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub title: String,
        pub text: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod users {
    use sea_orm::entity::prelude::*;

    #[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        #[sea_orm(unique)]
        pub username: String,
        pub password: String,
        pub display_name: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod comments {
    use sea_orm::entity::prelude::*;

    #[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "comments")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub news_id: i32,
        pub body: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod notes {
    use sea_orm::entity::prelude::*;

    #[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "notes")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub body: String,
        pub archived: bool,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

const SCHEMA: &[&str] = &[
    "CREATE TABLE news (
        id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
        title TEXT NOT NULL,
        text TEXT NULL
    )",
    "CREATE TABLE users (
        id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        display_name TEXT NULL
    )",
    "CREATE TABLE comments (
        id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
        news_id INTEGER NOT NULL REFERENCES news (id),
        body TEXT NOT NULL
    )",
    "CREATE TABLE notes (
        id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
        body TEXT NOT NULL,
        archived BOOLEAN NOT NULL DEFAULT FALSE
    )",
];

/// Create every test table on `conn`.
pub async fn create_schema(conn: &DatabaseConnection) -> Result<(), DbErr> {
    for stmt in SCHEMA {
        conn.execute_unprepared(stmt).await?;
    }
    Ok(())
}

/// Fresh in-memory database with the test schema.
pub async fn setup_db() -> DbHandle {
    let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default())
        .await
        .expect("connect to in-memory sqlite");
    create_schema(db.sea()).await.expect("create schema");
    db
}

// ---------------------------------------------------------------------------
// News: the plain case, ascending id as default order.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct News {
    pub id: i32,
    pub title: String,
    pub text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewsCreate {
    pub title: String,
    pub text: Option<String>,
}

impl NewsCreate {
    pub fn new(title: &str, text: Option<&str>) -> Self {
        Self {
            title: title.to_owned(),
            text: text.map(str::to_owned),
        }
    }
}

/// `None` leaves a field unchanged; `Some(None)` clears `text`.
#[derive(Debug, Clone, Default)]
pub struct NewsUpdate {
    pub title: Option<String>,
    pub text: Option<Option<String>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NewsHooks;

impl RepositoryHooks for NewsHooks {
    type Entity = news::Entity;
    type Model = News;
    type Id = i32;
    type CreateForm = NewsCreate;
    type UpdateForm = NewsUpdate;

    fn filter_by_id(&self, select: Select<news::Entity>, id: &i32) -> Select<news::Entity> {
        select.filter(news::Column::Id.eq(*id))
    }

    fn default_order(&self, select: Select<news::Entity>) -> Select<news::Entity> {
        select.order_by_asc(news::Column::Id)
    }

    fn to_domain(&self, record: news::Model) -> News {
        News {
            id: record.id,
            title: record.title,
            text: record.text,
        }
    }

    fn new_record(&self, form: NewsCreate) -> news::ActiveModel {
        news::ActiveModel {
            id: NotSet,
            title: Set(form.title),
            text: Set(form.text),
        }
    }

    fn apply_update(&self, record: &mut news::ActiveModel, form: NewsUpdate) {
        if let Some(title) = form.title {
            record.title = Set(title);
        }
        if let Some(text) = form.text {
            record.text = Set(text);
        }
    }
}

/// Ten news items: even ids titled `Topic {i}`, odd ids `Story {i}`.
/// Item 10 has no text.
pub async fn seed_news<R>(repo: &R) -> Vec<News>
where
    R: repokit_spec::AsyncCrudRepository<
            Model = News,
            CreateForm = NewsCreate,
            Error = repokit_db::RepoError,
        >,
{
    let mut out = Vec::new();
    for i in 1..=10 {
        let title = if i % 2 == 0 {
            format!("Topic {i}")
        } else {
            format!("Story {i}")
        };
        let text = (i != 10).then(|| format!("Text {i}"));
        out.push(repo.create(NewsCreate { title, text }).await.unwrap());
    }
    out
}

pub fn ids(items: &[News]) -> Vec<i32> {
    items.iter().map(|n| n.id).collect()
}

// ---------------------------------------------------------------------------
// Users: unique username.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UserCreate {
    pub username: String,
    pub password: String,
}

impl UserCreate {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_owned(),
            password: "secret".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub display_name: Option<Option<String>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UserHooks;

impl RepositoryHooks for UserHooks {
    type Entity = users::Entity;
    type Model = User;
    type Id = i32;
    type CreateForm = UserCreate;
    type UpdateForm = UserUpdate;

    fn filter_by_id(&self, select: Select<users::Entity>, id: &i32) -> Select<users::Entity> {
        select.filter(users::Column::Id.eq(*id))
    }

    fn to_domain(&self, record: users::Model) -> User {
        User {
            id: record.id,
            username: record.username,
            display_name: record.display_name,
        }
    }

    fn new_record(&self, form: UserCreate) -> users::ActiveModel {
        users::ActiveModel {
            id: NotSet,
            username: Set(form.username),
            password: Set(form.password),
            display_name: Set(None),
        }
    }

    fn apply_update(&self, record: &mut users::ActiveModel, form: UserUpdate) {
        if let Some(username) = form.username {
            record.username = Set(username);
        }
        if let Some(display_name) = form.display_name {
            record.display_name = Set(display_name);
        }
    }
}

// ---------------------------------------------------------------------------
// Comments: foreign key into news.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: i32,
    pub news_id: i32,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct CommentCreate {
    pub news_id: i32,
    pub body: String,
}

#[derive(Debug, Clone, Default)]
pub struct CommentUpdate {
    pub news_id: Option<i32>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CommentHooks;

impl RepositoryHooks for CommentHooks {
    type Entity = comments::Entity;
    type Model = Comment;
    type Id = i32;
    type CreateForm = CommentCreate;
    type UpdateForm = CommentUpdate;

    fn model_name(&self) -> &'static str {
        "Comment"
    }

    fn filter_by_id(&self, select: Select<comments::Entity>, id: &i32) -> Select<comments::Entity> {
        select.filter(comments::Column::Id.eq(*id))
    }

    fn to_domain(&self, record: comments::Model) -> Comment {
        Comment {
            id: record.id,
            news_id: record.news_id,
            body: record.body,
        }
    }

    fn new_record(&self, form: CommentCreate) -> comments::ActiveModel {
        comments::ActiveModel {
            id: NotSet,
            news_id: Set(form.news_id),
            body: Set(form.body),
        }
    }

    fn apply_update(&self, record: &mut comments::ActiveModel, form: CommentUpdate) {
        if let Some(news_id) = form.news_id {
            record.news_id = Set(news_id);
        }
    }
}

// ---------------------------------------------------------------------------
// Notes: archived rows are hidden by the default filter; newest first.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i32,
    pub body: String,
    pub archived: bool,
}

#[derive(Debug, Clone)]
pub struct NoteCreate {
    pub body: String,
    pub archived: bool,
}

impl NoteCreate {
    pub fn new(body: &str, archived: bool) -> Self {
        Self {
            body: body.to_owned(),
            archived,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NoteUpdate {
    pub body: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoteHooks;

impl RepositoryHooks for NoteHooks {
    type Entity = notes::Entity;
    type Model = Note;
    type Id = i32;
    type CreateForm = NoteCreate;
    type UpdateForm = NoteUpdate;

    fn filter_by_id(&self, select: Select<notes::Entity>, id: &i32) -> Select<notes::Entity> {
        select.filter(notes::Column::Id.eq(*id))
    }

    fn default_filter(&self, select: Select<notes::Entity>) -> Select<notes::Entity> {
        select.filter(notes::Column::Archived.eq(false))
    }

    fn default_order(&self, select: Select<notes::Entity>) -> Select<notes::Entity> {
        select.order_by_desc(notes::Column::Id)
    }

    fn to_domain(&self, record: notes::Model) -> Note {
        Note {
            id: record.id,
            body: record.body,
            archived: record.archived,
        }
    }

    fn new_record(&self, form: NoteCreate) -> notes::ActiveModel {
        notes::ActiveModel {
            id: NotSet,
            body: Set(form.body),
            archived: Set(form.archived),
        }
    }

    fn apply_update(&self, record: &mut notes::ActiveModel, form: NoteUpdate) {
        if let Some(body) = form.body {
            record.body = Set(body);
        }
    }
}
