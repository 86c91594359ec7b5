//! Usage reports

use super::{internal, Service};
use crate::contract::{AiGatewayError, UsageRecord, UsageSummary};
use crate::domain::usage::summarize;
use brainforge_kit::{Page, PageQuery, SecurityCtx};
use chrono::{DateTime, Utc};

impl Service {
    /// The caller's usage rows, newest first
    pub async fn list_usage(&self, ctx: &SecurityCtx, query: PageQuery) -> Result<Page<UsageRecord>, AiGatewayError> {
        let items = self
            .usage
            .list_for_user(ctx.user_id, query.limit(), query.offset())
            .await
            .map_err(internal)?;
        let total = self.usage.count_for_user(ctx.user_id).await.map_err(internal)?;
        Ok(Page::new(items, total, query))
    }

    pub async fn usage_summary(
        &self,
        ctx: &SecurityCtx,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<UsageSummary, AiGatewayError> {
        check_range(from, to)?;
        let records = self
            .usage
            .list_in_range(Some(ctx.user_id), from, to)
            .await
            .map_err(internal)?;
        Ok(summarize(&records, from, to))
    }

    /// Usage across every user; admins only
    pub async fn global_usage_summary(
        &self,
        ctx: &SecurityCtx,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<UsageSummary, AiGatewayError> {
        if !ctx.is_admin() {
            return Err(AiGatewayError::forbidden("global usage is restricted to admins"));
        }
        check_range(from, to)?;
        let records = self.usage.list_in_range(None, from, to).await.map_err(internal)?;
        Ok(summarize(&records, from, to))
    }
}

fn check_range(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Result<(), AiGatewayError> {
    match (from, to) {
        (Some(from), Some(to)) if from >= to => {
            Err(AiGatewayError::validation("'from' must be before 'to'"))
        }
        _ => Ok(()),
    }
}
