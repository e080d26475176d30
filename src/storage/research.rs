//! Research storage: save, load, transition, and search reports.
//!
//! A report is spread over three tables. `save_report` writes all of them;
//! the caller's transaction makes that a single atomic write.

use jiff::{Timestamp, fmt::temporal::DateTimePrinter};
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::model::{
    Beach, Coordinate, Page, PageRequest, ReportStatus, ResearchReport, ResearchSegment, Worker,
};

use super::{Result, StorageError, Tx, escape_like};

const REPORT_COLUMNS: &str = "
    r.id, r.beach_length, r.total_length, r.expected_trash_amount, r.reported_at,
    r.weather, r.special_note, r.status,
    m.username, m.name, m.contact,
    b.name, b.region, b.latitude, b.longitude";

const REPORT_JOINS: &str = "
    FROM research r
    JOIN member m ON m.username = r.researcher
    JOIN beach b ON b.name = r.beach";

/// Matches reports awaiting assignment, optionally narrowed by `?2`.
const NEEDED_FILTER: &str = r"
    WHERE r.status = ?1
      AND (?2 IS NULL
           OR b.name LIKE ?2 ESCAPE '\'
           OR m.username LIKE ?2 ESCAPE '\'
           OR m.name LIKE ?2 ESCAPE '\')";

impl Tx<'_> {
    /// Writes a report together with its segments and images.
    pub fn save_report(&self, report: &ResearchReport) -> Result<()> {
        let id = report.id.to_string();
        self.tx.execute(
            "INSERT INTO research (id, researcher, beach, beach_length, total_length,
                                   expected_trash_amount, reported_at, weather, special_note, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                &id,
                &report.researcher.username,
                &report.beach.name,
                report.beach_length,
                report.total_length,
                report.expected_trash_amount,
                format_timestamp(report.reported_at),
                &report.weather,
                &report.special_note,
                report.status.as_str(),
            ],
        )?;

        let mut segment_stmt = self.tx.prepare(
            "INSERT INTO research_segment (research_id, position, beach_name_with_index,
                                           start_lat, start_lon, end_lat, end_lon,
                                           main_trash_type, length)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;
        for (position, segment) in report.segments.iter().enumerate() {
            segment_stmt.execute(rusqlite::params![
                &id,
                position,
                &segment.beach_name_with_index,
                segment.start.latitude,
                segment.start.longitude,
                segment.end.latitude,
                segment.end.longitude,
                segment.main_trash_type.as_str(),
                segment.length,
            ])?;
        }

        let mut image_stmt = self.tx.prepare(
            "INSERT INTO research_image (research_id, position, file_name) VALUES (?1, ?2, ?3)",
        )?;
        for (position, file_name) in report.images.iter().enumerate() {
            image_stmt.execute(rusqlite::params![&id, position, file_name])?;
        }

        Ok(())
    }

    /// Loads a report with its researcher, beach, segments, and images.
    pub fn find_report_by_id(&self, id: Uuid) -> Result<Option<ResearchReport>> {
        let sql = format!("SELECT {REPORT_COLUMNS} {REPORT_JOINS} WHERE r.id = ?1");
        let row = self
            .tx
            .query_row(&sql, [id.to_string()], ReportRow::from_row)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut report = row.into_report()?;
        report.segments = self.load_segments(id)?;
        report.images = self.load_images(id)?;
        Ok(Some(report))
    }

    /// Overwrites a report's status.
    pub fn update_report_status(&self, id: Uuid, status: ReportStatus) -> Result<()> {
        let rows = self.tx.execute(
            "UPDATE research SET status = ?1 WHERE id = ?2",
            rusqlite::params![status.as_str(), id.to_string()],
        )?;
        if rows == 0 {
            return Err(StorageError::ReportNotFound(id));
        }
        Ok(())
    }

    /// Pages through reports awaiting assignment, newest first.
    ///
    /// A non-blank `term` keeps only reports whose beach name, researcher
    /// username, or researcher name contains it (ASCII case-insensitive).
    pub fn search_reports(
        &self,
        term: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<ResearchReport>> {
        let pattern = term
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| format!("%{}%", escape_like(t)));
        let status = ReportStatus::AssignmentNeeded.as_str();

        let total: i64 = self.tx.query_row(
            &format!("SELECT COUNT(*) {REPORT_JOINS} {NEEDED_FILTER}"),
            rusqlite::params![status, &pattern],
            |row| row.get(0),
        )?;

        let limit = i64::from(page.size);
        let offset = i64::try_from(page.offset())
            .map_err(|_| StorageError::Corrupt("page offset out of range".into()))?;
        let mut stmt = self.tx.prepare(&format!(
            "SELECT r.id {REPORT_JOINS} {NEEDED_FILTER}
             ORDER BY r.reported_at DESC, r.id
             LIMIT ?3 OFFSET ?4"
        ))?;
        let ids = stmt
            .query_map(rusqlite::params![status, &pattern, limit, offset], |row| {
                row.get::<_, String>(0)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut content = Vec::with_capacity(ids.len());
        for id in ids {
            let id = parse_id(&id)?;
            let report = self
                .find_report_by_id(id)?
                .ok_or(StorageError::ReportNotFound(id))?;
            content.push(report);
        }

        let total = u64::try_from(total)
            .map_err(|_| StorageError::Corrupt(format!("negative row count: {total}")))?;
        Ok(Page::new(content, page, total))
    }

    /// Report ids whose string form starts with `prefix`.
    pub fn find_report_ids_by_prefix(&self, prefix: &str) -> Result<Vec<Uuid>> {
        let mut stmt = self
            .tx
            .prepare(r"SELECT id FROM research WHERE id LIKE ?1 ESCAPE '\' ORDER BY id")?;
        let pattern = format!("{}%", escape_like(&prefix.to_ascii_lowercase()));
        let ids = stmt
            .query_map([pattern], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        ids.iter().map(|id| parse_id(id)).collect()
    }

    fn load_segments(&self, id: Uuid) -> Result<Vec<ResearchSegment>> {
        let mut stmt = self.tx.prepare(
            "SELECT beach_name_with_index, start_lat, start_lon, end_lat, end_lon,
                    main_trash_type, length
             FROM research_segment WHERE research_id = ?1 ORDER BY position",
        )?;
        let rows = stmt
            .query_map([id.to_string()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    Coordinate::new(row.get(1)?, row.get(2)?),
                    Coordinate::new(row.get(3)?, row.get(4)?),
                    row.get::<_, String>(5)?,
                    row.get::<_, f64>(6)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(beach_name_with_index, start, end, trash, length)| {
                let main_trash_type = trash
                    .parse()
                    .map_err(|e| StorageError::Corrupt(format!("segment of {id}: {e}")))?;
                Ok(ResearchSegment {
                    beach_name_with_index,
                    start,
                    end,
                    main_trash_type,
                    length,
                })
            })
            .collect()
    }

    fn load_images(&self, id: Uuid) -> Result<Vec<String>> {
        let mut stmt = self.tx.prepare(
            "SELECT file_name FROM research_image WHERE research_id = ?1 ORDER BY position",
        )?;
        let images = stmt
            .query_map([id.to_string()], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(images)
    }
}

/// Raw columns of one `research` row joined with its member and beach.
struct ReportRow {
    id: String,
    beach_length: Option<f64>,
    total_length: f64,
    expected_trash_amount: u32,
    reported_at: String,
    weather: String,
    special_note: String,
    status: String,
    researcher: Worker,
    beach: Beach,
}

impl ReportRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        let latitude: Option<f64> = row.get(13)?;
        let longitude: Option<f64> = row.get(14)?;
        Ok(Self {
            id: row.get(0)?,
            beach_length: row.get(1)?,
            total_length: row.get(2)?,
            expected_trash_amount: row.get(3)?,
            reported_at: row.get(4)?,
            weather: row.get(5)?,
            special_note: row.get(6)?,
            status: row.get(7)?,
            researcher: Worker {
                username: row.get(8)?,
                name: row.get(9)?,
                contact: row.get(10)?,
            },
            beach: Beach {
                name: row.get(11)?,
                region: row.get(12)?,
                center: latitude
                    .zip(longitude)
                    .map(|(lat, lon)| Coordinate::new(lat, lon)),
            },
        })
    }

    /// Decodes the text columns. Segments and images are left empty.
    fn into_report(self) -> Result<ResearchReport> {
        let id = parse_id(&self.id)?;
        let reported_at = self
            .reported_at
            .parse::<Timestamp>()
            .map_err(|e| StorageError::Corrupt(format!("invalid reported_at: {e}")))?;
        let status = self
            .status
            .parse::<ReportStatus>()
            .map_err(|e| StorageError::Corrupt(format!("report {id}: {e}")))?;

        Ok(ResearchReport {
            id,
            researcher: self.researcher,
            beach: self.beach,
            beach_length: self.beach_length,
            total_length: self.total_length,
            expected_trash_amount: self.expected_trash_amount,
            reported_at,
            weather: self.weather,
            special_note: self.special_note,
            status,
            segments: Vec::new(),
            images: Vec::new(),
        })
    }
}

fn parse_id(id: &str) -> Result<Uuid> {
    id.parse::<Uuid>()
        .map_err(|e| StorageError::Corrupt(format!("invalid report id: {e}")))
}

/// Fixed nanosecond precision so the text column sorts chronologically.
fn format_timestamp(ts: Timestamp) -> String {
    DateTimePrinter::new()
        .precision(Some(9))
        .timestamp_to_string(&ts)
}
