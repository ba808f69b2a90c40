//! V003: secondary indexes for listing, feed and favorite-count queries.
//! Same set as `tuning::PERFORMANCE_INDEXES`, so the tuning tool is a no-op
//! on a migrated database.

pub const MIGRATION_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_articles_created_at ON articles(created_at DESC, id DESC);
CREATE INDEX IF NOT EXISTS idx_articles_author_id ON articles(author_id);
CREATE INDEX IF NOT EXISTS idx_comments_article_id ON comments(article_id);
CREATE INDEX IF NOT EXISTS idx_comments_author_id ON comments(author_id);
CREATE INDEX IF NOT EXISTS idx_favorites_article_id ON favorites(article_id);
CREATE INDEX IF NOT EXISTS idx_favorites_user_id ON favorites(user_id);
CREATE INDEX IF NOT EXISTS idx_article_tags_tag_id ON article_tags(tag_id);
CREATE INDEX IF NOT EXISTS idx_follows_followee_id ON follows(followee_id);
"#;
