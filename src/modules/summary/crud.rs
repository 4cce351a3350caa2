use crate::modules::summary::model::MeetingSummary;
use crate::modules::summary::schema::SummariesQuery;
use bson::{doc, oid::ObjectId, Document};
use mongodb::{Collection, Database, IndexModel};

const COLLECTION_NAME: &str = "meeting_summaries";

/// Translates the caller's search parameters into a store filter. An
/// unrecognized method or missing parameters yields the empty filter.
/// Date bounds compare lexicographically, which matches chronological
/// order for zero-padded `YYYY-MM-DD` strings.
pub fn build_filter(query: &SummariesQuery) -> Document {
    match query.search_method.as_deref() {
        Some("By Date Range") => {
            if let (Some(start), Some(end)) = (&query.start_date, &query.end_date) {
                doc! { "meeting_date": { "$gte": start, "$lte": end } }
            } else {
                doc! {}
            }
        }
        Some("By Meeting Title") => {
            if let Some(title) = &query.title {
                doc! { "meeting_title": { "$regex": title, "$options": "i" } }
            } else {
                doc! {}
            }
        }
        _ => doc! {},
    }
}

pub struct SummaryCrud {
    collection: Collection<MeetingSummary>,
}

impl SummaryCrud {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_NAME),
        }
    }

    pub async fn create(&self, summary: MeetingSummary) -> Result<ObjectId, mongodb::error::Error> {
        let result = self.collection.insert_one(summary).await?;
        Ok(result.inserted_id.as_object_id().unwrap())
    }

    // Reads get a single retry; inserts are attempted exactly once.
    pub async fn find(&self, filter: Document) -> Result<Vec<MeetingSummary>, mongodb::error::Error> {
        match self.find_once(filter.clone()).await {
            Ok(summaries) => Ok(summaries),
            Err(e) => {
                tracing::warn!("summary query failed, retrying once: {}", e);
                self.find_once(filter).await
            }
        }
    }

    async fn find_once(&self, filter: Document) -> Result<Vec<MeetingSummary>, mongodb::error::Error> {
        use futures::TryStreamExt;

        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "meeting_date": -1 })
            .await?;

        cursor.try_collect().await
    }

    pub async fn count(&self) -> Result<u64, mongodb::error::Error> {
        self.collection.count_documents(doc! {}).await
    }

    pub async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        self.collection
            .create_index(IndexModel::builder().keys(doc! { "meeting_date": -1 }).build())
            .await?;
        self.collection
            .create_index(IndexModel::builder().keys(doc! { "meeting_title": 1 }).build())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(
        search_method: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
        title: Option<&str>,
    ) -> SummariesQuery {
        SummariesQuery {
            search_method: search_method.map(String::from),
            start_date: start_date.map(String::from),
            end_date: end_date.map(String::from),
            title: title.map(String::from),
        }
    }

    #[test]
    fn date_range_filter_is_inclusive() {
        let filter = build_filter(&query(
            Some("By Date Range"),
            Some("2024-06-01"),
            Some("2024-06-30"),
            None,
        ));

        assert_eq!(
            filter,
            doc! { "meeting_date": { "$gte": "2024-06-01", "$lte": "2024-06-30" } }
        );
    }

    #[test]
    fn title_filter_is_case_insensitive() {
        let filter = build_filter(&query(Some("By Meeting Title"), None, None, Some("sprint")));

        assert_eq!(
            filter,
            doc! { "meeting_title": { "$regex": "sprint", "$options": "i" } }
        );
    }

    #[test]
    fn missing_params_fall_back_to_empty_filter() {
        assert_eq!(
            build_filter(&query(Some("By Date Range"), Some("2024-06-01"), None, None)),
            doc! {}
        );
        assert_eq!(
            build_filter(&query(Some("By Meeting Title"), None, None, None)),
            doc! {}
        );
    }

    #[test]
    fn unknown_method_returns_everything() {
        assert_eq!(build_filter(&query(None, None, None, None)), doc! {});
        assert_eq!(build_filter(&query(Some("By Phase Of Moon"), None, None, None)), doc! {});
    }
}
