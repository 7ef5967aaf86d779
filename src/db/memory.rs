//! Implementación en memoria de los stores, usada por los tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};
use uuid::Uuid;

use super::{CommentStore, ContentStore, SubmissionStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        comment::{Comment, CommentParent, CommentStatus, NewComment},
        content::{
            ContentChanges, ContentFilter, ContentKind, ContentRecord, ContentStatus, Counter,
            NewContent,
        },
        submission::{ContactMessage, ContactSchema, Subscriber},
    },
};

#[derive(Default)]
struct Inner {
    records: HashMap<(ContentKind, Uuid), ContentRecord>,
    comments: Vec<Comment>,
    subscribers: Vec<Subscriber>,
    contacts: Vec<ContactMessage>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    slug_queries: AtomicUsize,
    mutations: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consultas por slug recibidas
    pub fn slug_queries(&self) -> usize {
        self.slug_queries.load(Ordering::SeqCst)
    }

    /// Escrituras recibidas (insert, update, delete, increment)
    pub fn mutations(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    /// Inserta un registro publicado con título y cuerpo dados
    pub fn seed(&self, kind: ContentKind, title: &str, slug: &str, content: &str) -> ContentRecord {
        let now = Utc::now();
        let record = ContentRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            slug: slug.to_string(),
            status: ContentStatus::Published,
            content: content.to_string(),
            excerpt: None,
            featured_image: None,
            author: None,
            category: None,
            tags: Vec::new(),
            reading_time: 1,
            views: None,
            downloads: None,
            likes: None,
            created_at: now,
            updated_at: now,
            published_at: Some(now),
        };
        self.put(kind, record.clone());
        record
    }

    pub fn put(&self, kind: ContentKind, record: ContentRecord) {
        let mut inner = self.inner.lock().unwrap();
        inner.records.insert((kind, record.id), record);
    }

    pub fn seed_comment(
        &self,
        parent: CommentParent,
        body: &str,
        status: CommentStatus,
        created_at: DateTime<Utc>,
    ) -> Comment {
        let comment = build_comment(
            NewComment {
                parent,
                author_name: "Ana".to_string(),
                author_email: "ana@example.com".to_string(),
                body: body.to_string(),
                ip_address: "unknown".to_string(),
                user_agent: "unknown".to_string(),
            },
            status,
            created_at,
        );
        self.inner.lock().unwrap().comments.push(comment.clone());
        comment
    }

    pub fn contact_count(&self) -> usize {
        self.inner.lock().unwrap().contacts.len()
    }

    fn touch(&self) {
        self.mutations.fetch_add(1, Ordering::SeqCst);
    }
}

fn parent_of(comment: &Comment) -> Option<CommentParent> {
    match (comment.blog_id, comment.research_id) {
        (Some(id), _) => Some(CommentParent { kind: ContentKind::Blog, id }),
        (None, Some(id)) => Some(CommentParent { kind: ContentKind::Research, id }),
        (None, None) => None,
    }
}

fn build_comment(new: NewComment, status: CommentStatus, created_at: DateTime<Utc>) -> Comment {
    let (blog_id, research_id) = match new.parent.kind {
        ContentKind::Blog => (Some(new.parent.id), None),
        ContentKind::Research => (None, Some(new.parent.id)),
    };
    Comment {
        id: Uuid::new_v4(),
        blog_id,
        research_id,
        author_name: new.author_name,
        author_email: new.author_email,
        body: new.body,
        status,
        ip_address: new.ip_address,
        user_agent: new.user_agent,
        created_at,
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn find_id_by_slug(&self, kind: ContentKind, slug: &str) -> AppResult<Option<Uuid>> {
        self.slug_queries.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .records
            .iter()
            .find(|((k, _), r)| *k == kind && r.slug == slug)
            .map(|(_, r)| r.id))
    }

    async fn get(&self, kind: ContentKind, id: Uuid) -> AppResult<Option<ContentRecord>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.records.get(&(kind, id)).cloned())
    }

    async fn get_by_slug(&self, kind: ContentKind, slug: &str) -> AppResult<Option<ContentRecord>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .records
            .iter()
            .find(|((k, _), r)| *k == kind && r.slug == slug)
            .map(|(_, r)| r.clone()))
    }

    async fn list(&self, kind: ContentKind, filter: &ContentFilter) -> AppResult<Vec<ContentRecord>> {
        let inner = self.inner.lock().unwrap();
        let mut records: Vec<ContentRecord> = inner
            .records
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|(_, r)| r)
            .filter(|r| filter.status.map_or(true, |s| r.status == s))
            .filter(|r| filter.category.as_ref().map_or(true, |c| r.category.as_ref() == Some(c)))
            .filter(|r| filter.tag.as_ref().map_or(true, |t| r.tags.contains(t)))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(filter.limit.unwrap_or(20).max(0) as usize);
        Ok(records)
    }

    async fn insert(&self, kind: ContentKind, new: NewContent) -> AppResult<ContentRecord> {
        self.touch();
        let mut inner = self.inner.lock().unwrap();
        if inner.records.iter().any(|((k, _), r)| *k == kind && r.slug == new.slug) {
            return Err(AppError::Conflict(format!("slug duplicado: {}", new.slug)));
        }
        let now = Utc::now();
        let record = ContentRecord {
            id: Uuid::new_v4(),
            title: new.title,
            slug: new.slug,
            status: new.status,
            content: new.content,
            excerpt: new.excerpt,
            featured_image: new.featured_image,
            author: new.author,
            category: new.category,
            tags: new.tags,
            reading_time: new.reading_time,
            views: Some(0),
            downloads: Some(0),
            likes: Some(0),
            created_at: now,
            updated_at: now,
            published_at: new.published_at,
        };
        inner.records.insert((kind, record.id), record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        kind: ContentKind,
        id: Uuid,
        changes: ContentChanges,
    ) -> AppResult<Option<ContentRecord>> {
        self.touch();
        let mut inner = self.inner.lock().unwrap();
        if let Some(slug) = &changes.slug {
            let taken = inner
                .records
                .iter()
                .any(|((k, other), r)| *k == kind && *other != id && &r.slug == slug);
            if taken {
                return Err(AppError::Conflict(format!("slug duplicado: {}", slug)));
            }
        }
        let Some(record) = inner.records.get_mut(&(kind, id)) else {
            return Ok(None);
        };
        if let Some(v) = changes.title {
            record.title = v;
        }
        if let Some(v) = changes.slug {
            record.slug = v;
        }
        if let Some(v) = changes.status {
            record.status = v;
        }
        if let Some(v) = changes.content {
            record.content = v;
        }
        if let Some(v) = changes.excerpt {
            record.excerpt = Some(v);
        }
        if let Some(v) = changes.featured_image {
            record.featured_image = Some(v);
        }
        if let Some(v) = changes.author {
            record.author = Some(v);
        }
        if let Some(v) = changes.category {
            record.category = Some(v);
        }
        if let Some(v) = changes.tags {
            record.tags = v;
        }
        if let Some(v) = changes.reading_time {
            record.reading_time = v;
        }
        if let Some(v) = changes.published_at {
            record.published_at = Some(v);
        }
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }

    async fn delete(&self, kind: ContentKind, id: Uuid) -> AppResult<bool> {
        self.touch();
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.records.remove(&(kind, id)).is_some())
    }

    async fn increment(&self, kind: ContentKind, id: Uuid, counter: Counter) -> AppResult<Option<i64>> {
        self.touch();
        let mut inner = self.inner.lock().unwrap();
        let Some(record) = inner.records.get_mut(&(kind, id)) else {
            return Ok(None);
        };
        let field = match counter {
            Counter::Views => &mut record.views,
            Counter::Downloads => &mut record.downloads,
            Counter::Likes => &mut record.likes,
        };
        let next = field.unwrap_or(0) + 1;
        *field = Some(next);
        Ok(Some(next))
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn insert_comment(&self, new: NewComment) -> AppResult<Comment> {
        self.touch();
        let comment = build_comment(new, CommentStatus::Pending, Utc::now());
        self.inner.lock().unwrap().comments.push(comment.clone());
        Ok(comment)
    }

    async fn approved_comments(
        &self,
        parent: CommentParent,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Comment>, i64)> {
        let inner = self.inner.lock().unwrap();
        let mut approved: Vec<Comment> = inner
            .comments
            .iter()
            .filter(|c| parent_of(c) == Some(parent) && c.status == CommentStatus::Approved)
            .cloned()
            .collect();
        approved.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = approved.len() as i64;
        let page = approved
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn set_comment_status(&self, id: Uuid, status: CommentStatus) -> AppResult<Option<Comment>> {
        self.touch();
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.comments.iter_mut().find(|c| c.id == id).map(|c| {
            c.status = status;
            c.clone()
        }))
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn add_subscriber(&self, email: &str) -> AppResult<Option<Subscriber>> {
        self.touch();
        let mut inner = self.inner.lock().unwrap();
        if inner.subscribers.iter().any(|s| s.email == email) {
            return Ok(None);
        }
        let subscriber = Subscriber {
            id: Uuid::new_v4(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        inner.subscribers.push(subscriber.clone());
        Ok(Some(subscriber))
    }

    async fn add_contact_message(&self, message: ContactSchema) -> AppResult<ContactMessage> {
        self.touch();
        let saved = ContactMessage {
            id: Uuid::new_v4(),
            name: message.name,
            email: message.email,
            subject: message.subject,
            message: message.message,
            created_at: Utc::now(),
        };
        self.inner.lock().unwrap().contacts.push(saved.clone());
        Ok(saved)
    }
}
