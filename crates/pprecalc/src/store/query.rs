use sqlx::{MySql, QueryBuilder};

use crate::game::Ruleset;
use crate::score::SelectionFilter;

use super::{LOVED_PP, PpWrite};

/// `completed` value of a finished, submitted play
pub const COMPLETED_STATUS: u8 = 3;

/// Build the candidate selection query.
///
/// The table name comes from `Ruleset`; every other value is bound. Integer
/// columns are cast to SIGNED so they decode as `i64` regardless of the
/// column's declared width. Rows whose map is missing from `beatmaps` are kept
/// so they can be reported as skipped.
pub fn select_query(filter: &SelectionFilter) -> QueryBuilder<'static, MySql> {
    let t = filter.table();
    let mut qb = QueryBuilder::new(format!(
        "SELECT CAST({t}.id AS SIGNED) AS id, CAST({t}.mods AS SIGNED) AS mods, \
         CAST({t}.max_combo AS SIGNED) AS max_combo, \
         CAST({t}.`100_count` AS SIGNED) AS count_100, \
         CAST({t}.`50_count` AS SIGNED) AS count_50, \
         CAST({t}.misses_count AS SIGNED) AS misses, \
         CAST(beatmaps.beatmap_id AS SIGNED) AS beatmap_id, \
         CAST(beatmaps.ranked AS SIGNED) AS ranked \
         FROM {t} \
         LEFT JOIN beatmaps ON beatmaps.beatmap_md5 = {t}.beatmap_md5 \
         LEFT JOIN users ON users.id = {t}.userid \
         WHERE {t}.completed = "
    ));
    qb.push_bind(COMPLETED_STATUS);
    qb.push(format!(" AND {t}.play_mode = "));
    qb.push_bind(filter.mode().code());
    qb.push(" AND users.privileges & 1");

    qb.push(" AND (beatmaps.beatmap_id IS NULL OR beatmaps.ranked IN (");
    {
        let mut statuses = qb.separated(", ");
        for status in filter.statuses() {
            statuses.push_bind(status.code());
        }
    }
    qb.push("))");

    if let Some(map_id) = filter.map_id() {
        qb.push(" AND beatmaps.beatmap_id = ");
        qb.push_bind(map_id);
    }

    if let Some(limit) = filter.limit() {
        qb.push(" LIMIT ");
        qb.push_bind(limit);
    }

    qb
}

/// Build the single-statement update for a pp write
pub fn update_query(ruleset: Ruleset, write: PpWrite) -> QueryBuilder<'static, MySql> {
    let mut qb = QueryBuilder::new(format!("UPDATE {} SET ", ruleset.score_table()));
    let score_id = match write {
        PpWrite::Loved { score_id, value } => {
            qb.push("score = ");
            qb.push_bind(f64::from(value));
            qb.push(", pp = ");
            qb.push_bind(LOVED_PP);
            score_id
        }
        PpWrite::Rating { score_id, pp } => {
            qb.push("pp = ");
            qb.push_bind(f64::from(pp));
            score_id
        }
    };
    qb.push(" WHERE id = ");
    qb.push_bind(score_id);
    qb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameMode, RankedStatus};

    fn normalize(sql: &str) -> String {
        sql.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_select_without_refinements() {
        let filter = SelectionFilter::builder().build().unwrap();
        let sql = normalize(select_query(&filter).sql());

        assert!(sql.contains("FROM scores_relax LEFT JOIN beatmaps"));
        assert!(sql.contains("beatmaps.beatmap_md5 = scores_relax.beatmap_md5"));
        assert!(sql.contains("users.id = scores_relax.userid"));
        assert!(sql.contains("WHERE scores_relax.completed = ? AND scores_relax.play_mode = ?"));
        assert!(sql.contains("users.privileges & 1"));
        assert!(sql.contains("beatmaps.ranked IN (?, ?))"));
        assert!(!sql.contains("beatmaps.beatmap_id = ?"));
        assert!(!sql.contains("LIMIT"));
    }

    #[test]
    fn test_select_with_all_refinements() {
        let filter = SelectionFilter::builder()
            .mode(GameMode::Taiko)
            .ruleset(Ruleset::Vanilla)
            .ranked(Some(RankedStatus::Loved))
            .map_id(Some(315))
            .limit(Some(100))
            .build()
            .unwrap();
        let sql = normalize(select_query(&filter).sql());

        assert!(sql.contains("FROM scores LEFT JOIN"));
        assert!(sql.contains("beatmaps.ranked IN (?))"));
        assert!(sql.ends_with("AND beatmaps.beatmap_id = ? LIMIT ?"));
    }

    #[test]
    fn test_select_never_interpolates_values() {
        let filter = SelectionFilter::builder()
            .map_id(Some(987654))
            .limit(Some(4321))
            .build()
            .unwrap();
        let sql = select_query(&filter).sql().to_string();
        assert!(!sql.contains("987654"));
        assert!(!sql.contains("4321"));
    }

    #[test]
    fn test_loved_update_is_one_statement() {
        let write = PpWrite::Loved {
            score_id: 7,
            value: 250.0,
        };
        let sql = normalize(update_query(Ruleset::Relax, write).sql());
        assert_eq!(sql, "UPDATE scores_relax SET score = ?, pp = ? WHERE id = ?");
    }

    #[test]
    fn test_rating_update_touches_pp_only() {
        let write = PpWrite::Rating {
            score_id: 7,
            pp: 99.0,
        };
        let sql = normalize(update_query(Ruleset::Vanilla, write).sql());
        assert_eq!(sql, "UPDATE scores SET pp = ? WHERE id = ?");
    }
}
