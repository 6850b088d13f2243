//! Кеш отчётов события (схема зала и нарушения).
//!
//! Ключи отчётов содержат поколение события `reports_gen:{id}`. Каждая правка
//! назначений увеличивает поколение, поэтому отчёт, посчитанный до правки и
//! записанный после неё, попадает под старый ключ и больше никем не читается.

use crate::cache::CacheService;
use crate::engine::IssuesReport;
use crate::services::seatmap::SeatmapEntry;

fn generation_key(event_id: i64) -> String {
    format!("reports_gen:{}", event_id)
}

/// Адрес отчётов события в пределах одного поколения.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSlot {
    pub event_id: i64,
    pub generation: u64,
}

impl ReportSlot {
    pub fn issues_key(&self) -> String {
        format!("issues:{}:{}", self.event_id, self.generation)
    }

    pub fn seatmap_key(&self) -> String {
        format!("seatmap:{}:{}", self.event_id, self.generation)
    }
}

impl CacheService {
    /// Текущее поколение отчётов. Берётся до чтения из БД; `None` - Redis недоступен.
    pub async fn report_slot(&self, event_id: i64) -> Option<ReportSlot> {
        let generation = self.counter(&generation_key(event_id)).await?;
        Some(ReportSlot { event_id, generation })
    }

    pub async fn get_issues(&self, slot: &ReportSlot) -> Option<IssuesReport> {
        self.get_json(&slot.issues_key()).await
    }

    pub async fn cache_issues(&self, slot: &ReportSlot, report: &IssuesReport) {
        self.set_json(&slot.issues_key(), report).await
    }

    pub async fn get_seatmap(&self, slot: &ReportSlot) -> Option<Vec<SeatmapEntry>> {
        self.get_json(&slot.seatmap_key()).await
    }

    pub async fn cache_seatmap(&self, slot: &ReportSlot, seatmap: &[SeatmapEntry]) {
        self.set_json(&slot.seatmap_key(), &seatmap).await
    }

    // После любой правки назначений события
    pub async fn invalidate_event(&self, event_id: i64) {
        self.invalidate_events(&[event_id]).await
    }

    pub async fn invalidate_events(&self, event_ids: &[i64]) {
        let mut stale = Vec::with_capacity(event_ids.len() * 2);
        for &event_id in event_ids {
            let Some(next) = self.bump(&generation_key(event_id)).await else {
                continue;
            };
            // записи прошлого поколения больше не читаются, освобождаем память сразу
            let previous = ReportSlot { event_id, generation: next.saturating_sub(1) };
            stale.push(previous.issues_key());
            stale.push(previous.seatmap_key());
        }
        self.delete(stale).await;
        tracing::info!("Invalidated report cache for events {:?}", event_ids);
    }
}
