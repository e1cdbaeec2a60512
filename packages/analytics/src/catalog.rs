//! In-memory evaluators for the query catalog.
//!
//! Each evaluator reproduces the store-side SQL of its [`CatalogQuery`]:
//! same filters, same grouping, same measures, same ordering and limits.
//! Rows missing an attribute a query needs are dropped from that query
//! only. Ties in ordering fall back to grouping-key order; callers should
//! not rely on it.

use std::collections::BTreeMap;

use securecheck_analytics_models::CatalogQuery;
use securecheck_database_models::{CellValue, TabularResult};
use securecheck_stop_models::{ArrestAgeGroup, DemographicAgeGroup, DriverGender, StopRecord};

use crate::aggregate::{
    StopTally, by_count_desc, count_by, desc_f64, percentage, rank_desc, round_ratio, tally_by,
};

type Row = Vec<CellValue>;

/// Evaluates `query` against the full record set.
#[must_use]
pub fn run(records: &[StopRecord], query: CatalogQuery) -> TabularResult {
    let rows = match query {
        CatalogQuery::DrugStopVehicles => top_vehicles(records, |r| r.drugs_related_stop),
        CatalogQuery::SearchedVehicles => top_vehicles(records, |r| r.search_conducted),
        CatalogQuery::ArrestRateByAgeGroup => arrest_rate_by_age_group(records),
        CatalogQuery::GenderByCountry => gender_by_country(records),
        CatalogQuery::RaceGenderSearchRate => race_gender_search_rate(records),
        CatalogQuery::BusiestHour => busiest_hour(records),
        CatalogQuery::AverageDurationByViolation => average_duration_by_violation(records),
        CatalogQuery::NightArrestRate => night_arrest_rate(records),
        CatalogQuery::ViolationSearchArrest => violation_search_arrest(records),
        CatalogQuery::YoungDriverViolations => young_driver_violations(records),
        CatalogQuery::RarelySearchedViolation => rarely_searched_violation(records),
        CatalogQuery::DrugRateByCountry => drug_rate_by_country(records),
        CatalogQuery::ArrestRateByCountryViolation => arrest_rate_by_country_violation(records),
        CatalogQuery::MostSearchedCountry => most_searched_country(records),
        CatalogQuery::YearlyCountryArrests => yearly_country_arrests(records),
        CatalogQuery::AgeRaceViolationTrends => age_race_violation_trends(records),
        CatalogQuery::TimePeriodBreakdown => time_period_breakdown(records),
        CatalogQuery::HighSearchArrestViolations => high_search_arrest_violations(records),
        CatalogQuery::DemographicsByCountry => demographics_by_country(records),
        CatalogQuery::TopArrestRateViolations => top_arrest_rate_violations(records),
    };

    let mut table = TabularResult::new(query.columns().iter().copied());
    for row in rows {
        table.push_row(row);
    }
    log::debug!("'{query}' produced {} row(s)", table.row_count());
    table
}

fn top_vehicles(records: &[StopRecord], flag: impl Fn(&StopRecord) -> bool) -> Vec<Row> {
    let counts = count_by(records.iter().filter(|r| flag(r)), |r| r.vehicle_number.clone());

    by_count_desc(counts)
        .into_iter()
        .take(10)
        .map(|(vehicle, count)| vec![vehicle.into(), count.into()])
        .collect()
}

fn arrest_rate_by_age_group(records: &[StopRecord]) -> Vec<Row> {
    let tallies = tally_by(records, |r| r.driver_age.map(ArrestAgeGroup::from_age));

    let mut groups: Vec<(ArrestAgeGroup, StopTally)> = tallies.into_iter().collect();
    groups.sort_by(|a, b| desc_f64(a.1.arrest_rate(), b.1.arrest_rate()));

    groups
        .into_iter()
        .take(1)
        .map(|(group, tally)| {
            vec![
                group.to_string().into(),
                tally.stops.into(),
                tally.arrests.into(),
                tally.arrest_rate().into(),
            ]
        })
        .collect()
}

fn gender_by_country(records: &[StopRecord]) -> Vec<Row> {
    let mut by_country: BTreeMap<Option<String>, (u64, u64)> = BTreeMap::new();
    for record in records {
        let Some(gender) = record.driver_gender else {
            continue;
        };
        let entry = by_country.entry(record.country_name.clone()).or_default();
        match gender {
            DriverGender::Male => entry.0 += 1,
            DriverGender::Female => entry.1 += 1,
        }
    }

    // Null country sorts last, as it does in the store.
    let mut countries: Vec<_> = by_country.into_iter().collect();
    countries.sort_by_key(|(country, _)| country.is_none());

    countries
        .into_iter()
        .map(|(country, (male, female))| vec![country.into(), male.into(), female.into()])
        .collect()
}

fn race_gender_search_rate(records: &[StopRecord]) -> Vec<Row> {
    let tallies = tally_by(records, |r| r.driver_race.clone().zip(r.driver_gender));

    let mut groups: Vec<_> = tallies.into_iter().collect();
    groups.sort_by(|a, b| desc_f64(a.1.search_rate(), b.1.search_rate()));

    groups
        .into_iter()
        .take(1)
        .map(|((race, gender), tally)| {
            vec![
                race.into(),
                gender.to_string().into(),
                tally.stops.into(),
                tally.searches.into(),
                tally.search_rate().into(),
            ]
        })
        .collect()
}

fn busiest_hour(records: &[StopRecord]) -> Vec<Row> {
    by_count_desc(count_by(records, StopRecord::hour))
        .into_iter()
        .take(1)
        .map(|(hour, count)| vec![hour.into(), count.into()])
        .collect()
}

fn average_duration_by_violation(records: &[StopRecord]) -> Vec<Row> {
    // Sums are kept in half-minutes so the average rounds exactly.
    let mut sums: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for record in records {
        let (Some(_), Some(violation)) = (&record.stop_duration, &record.violation) else {
            continue;
        };
        let entry = sums.entry(violation.clone()).or_insert((0, 0));
        if let Some(bucket) = record.duration_bucket() {
            entry.0 += bucket.half_minutes();
            entry.1 += 1;
        }
    }

    let mut averages: Vec<(String, Option<f64>)> = sums
        .into_iter()
        .map(|(violation, (sum, n))| (violation, (n > 0).then(|| round_ratio(sum, 2 * n))))
        .collect();

    // Descending with groups that have no known bucket first, as the store
    // orders NULL averages.
    averages.sort_by(|a, b| match (a.1, b.1) {
        (None, None) => std::cmp::Ordering::Equal,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (Some(_), None) => std::cmp::Ordering::Greater,
        (Some(x), Some(y)) => desc_f64(x, y),
    });

    averages
        .into_iter()
        .map(|(violation, avg)| vec![violation.into(), avg.into()])
        .collect()
}

fn night_arrest_rate(records: &[StopRecord]) -> Vec<Row> {
    tally_by(records, StopRecord::time_of_day)
        .into_iter()
        .map(|(time_of_day, tally)| {
            vec![
                time_of_day.to_string().into(),
                tally.stops.into(),
                tally.arrests.into(),
                tally.arrest_rate().into(),
            ]
        })
        .collect()
}

fn violation_search_arrest(records: &[StopRecord]) -> Vec<Row> {
    let mut groups: Vec<_> = tally_by(records, |r| r.violation.clone()).into_iter().collect();
    groups.sort_by(|a, b| {
        b.1.searches
            .cmp(&a.1.searches)
            .then(b.1.arrests.cmp(&a.1.arrests))
    });

    groups
        .into_iter()
        .map(|(violation, tally)| {
            vec![
                violation.into(),
                tally.stops.into(),
                tally.searches.into(),
                tally.search_rate().into(),
                tally.arrests.into(),
                tally.arrest_rate().into(),
            ]
        })
        .collect()
}

fn young_driver_violations(records: &[StopRecord]) -> Vec<Row> {
    let young = records
        .iter()
        .filter(|r| r.driver_age.is_some_and(|age| age < 25));

    by_count_desc(count_by(young, |r| r.violation.clone()))
        .into_iter()
        .map(|(violation, count)| vec![violation.into(), count.into()])
        .collect()
}

fn rarely_searched_violation(records: &[StopRecord]) -> Vec<Row> {
    // Every row counts here, including stops without a violation.
    let mut groups: Vec<_> = tally_by(records, |r| Some(r.violation.clone()))
        .into_iter()
        .map(|(violation, tally)| {
            let pct = percentage(tally.searched_or_arrested, tally.stops);
            (violation, tally, pct)
        })
        .collect();
    groups.sort_by(|a, b| a.2.total_cmp(&b.2).then(b.1.stops.cmp(&a.1.stops)));

    groups
        .into_iter()
        .take(1)
        .map(|(violation, tally, pct)| {
            vec![
                violation.into(),
                tally.stops.into(),
                tally.searched_or_arrested.into(),
                pct.into(),
            ]
        })
        .collect()
}

fn drug_rate_by_country(records: &[StopRecord]) -> Vec<Row> {
    let mut groups: Vec<_> = tally_by(records, |r| r.country_name.clone())
        .into_iter()
        .map(|(country, tally)| {
            let pct = percentage(tally.drug_stops, tally.stops);
            (country, tally, pct)
        })
        .collect();
    groups.sort_by(|a, b| desc_f64(a.2, b.2));

    groups
        .into_iter()
        .take(1)
        .map(|(country, tally, pct)| {
            vec![
                country.into(),
                tally.stops.into(),
                tally.drug_stops.into(),
                pct.into(),
            ]
        })
        .collect()
}

fn arrest_rate_by_country_violation(records: &[StopRecord]) -> Vec<Row> {
    let tallies = tally_by(records, |r| r.country_name.clone().zip(r.violation.clone()));

    let mut groups: Vec<_> = tallies.into_iter().collect();
    groups.sort_by(|a, b| desc_f64(a.1.arrest_rate(), b.1.arrest_rate()));

    groups
        .into_iter()
        .map(|((country, violation), tally)| {
            vec![
                country.into(),
                violation.into(),
                tally.stops.into(),
                tally.arrests.into(),
                tally.arrest_rate().into(),
            ]
        })
        .collect()
}

fn most_searched_country(records: &[StopRecord]) -> Vec<Row> {
    let searched = records.iter().filter(|r| r.search_conducted);

    by_count_desc(count_by(searched, |r| r.country_name.clone()))
        .into_iter()
        .take(1)
        .map(|(country, count)| vec![country.into(), count.into()])
        .collect()
}

fn yearly_country_arrests(records: &[StopRecord]) -> Vec<Row> {
    let tallies = tally_by(records, |r| r.year().zip(r.country_name.clone()));

    let mut by_year: BTreeMap<i32, Vec<(String, StopTally)>> = BTreeMap::new();
    for ((year, country), tally) in tallies {
        by_year.entry(year).or_default().push((country, tally));
    }

    let mut rows = Vec::new();
    for (year, countries) in by_year {
        let arrests: Vec<u64> = countries.iter().map(|(_, t)| t.arrests).collect();
        let ranks = rank_desc(&arrests);

        let mut ranked: Vec<_> = countries.into_iter().zip(ranks).collect();
        ranked.sort_by_key(|(_, rank)| *rank);

        for ((country, tally), rank) in ranked {
            rows.push(vec![
                year.into(),
                country.into(),
                tally.stops.into(),
                tally.arrests.into(),
                tally.arrest_rate().into(),
                rank.into(),
            ]);
        }
    }
    rows
}

fn age_race_violation_trends(records: &[StopRecord]) -> Vec<Row> {
    let mut totals: BTreeMap<(String, String), u64> = BTreeMap::new();
    let mut counts: BTreeMap<(String, String), BTreeMap<String, u64>> = BTreeMap::new();

    for record in records {
        let Some(race) = &record.driver_race else {
            continue;
        };
        let band = DemographicAgeGroup::from_age(record.driver_age).to_string();
        let key = (race.clone(), band);

        *totals.entry(key.clone()).or_insert(0) += 1;
        if let Some(violation) = &record.violation {
            *counts
                .entry(key)
                .or_default()
                .entry(violation.clone())
                .or_insert(0) += 1;
        }
    }

    let mut rows = Vec::new();
    for ((race, band), violations) in counts {
        let total = totals.get(&(race.clone(), band.clone())).copied().unwrap_or(0);
        let top = violations.values().copied().max().unwrap_or(0);

        for (violation, count) in violations.into_iter().filter(|(_, c)| *c == top) {
            rows.push(vec![
                race.clone().into(),
                band.clone().into(),
                violation.into(),
                count.into(),
                total.into(),
            ]);
        }
    }
    rows
}

fn time_period_breakdown(records: &[StopRecord]) -> Vec<Row> {
    let periods = count_by(records, |r| Some((r.year()?, r.month()?, r.hour()?)));

    periods
        .into_iter()
        .map(|((year, month, hour), count)| {
            vec![year.into(), month.into(), hour.into(), count.into()]
        })
        .collect()
}

fn high_search_arrest_violations(records: &[StopRecord]) -> Vec<Row> {
    let stats: Vec<(String, StopTally)> = tally_by(records, |r| r.violation.clone())
        .into_iter()
        .collect();

    let search_rates: Vec<f64> = stats.iter().map(|(_, t)| t.search_rate()).collect();
    let arrest_rates: Vec<f64> = stats.iter().map(|(_, t)| t.arrest_rate()).collect();
    let search_ranks = rank_desc(&search_rates);
    let arrest_ranks = rank_desc(&arrest_rates);

    let mut ranked: Vec<_> = stats
        .into_iter()
        .zip(search_ranks.into_iter().zip(arrest_ranks))
        .filter(|(_, (search_rank, arrest_rank))| *search_rank <= 5 || *arrest_rank <= 5)
        .collect();
    ranked.sort_by_key(|(_, ranks)| *ranks);

    ranked
        .into_iter()
        .map(|((violation, tally), (search_rank, arrest_rank))| {
            vec![
                violation.into(),
                tally.stops.into(),
                tally.searches.into(),
                tally.search_rate().into(),
                search_rank.into(),
                tally.arrests.into(),
                tally.arrest_rate().into(),
                arrest_rank.into(),
            ]
        })
        .collect()
}

fn demographics_by_country(records: &[StopRecord]) -> Vec<Row> {
    let groups = count_by(records, |r| {
        Some((
            r.country_name.clone()?,
            DemographicAgeGroup::from_age(Some(r.driver_age?)).to_string(),
            r.driver_gender?.to_string(),
            r.driver_race.clone()?,
        ))
    });

    groups
        .into_iter()
        .map(|((country, band, gender, race), count)| {
            vec![
                country.into(),
                band.into(),
                gender.into(),
                race.into(),
                count.into(),
            ]
        })
        .collect()
}

fn top_arrest_rate_violations(records: &[StopRecord]) -> Vec<Row> {
    let mut groups: Vec<_> = tally_by(records, |r| r.violation.clone()).into_iter().collect();
    groups.sort_by(|a, b| desc_f64(a.1.arrest_rate(), b.1.arrest_rate()));

    groups
        .into_iter()
        .take(5)
        .map(|(violation, tally)| {
            vec![
                violation.into(),
                tally.stops.into(),
                tally.arrests.into(),
                tally.arrest_rate().into(),
            ]
        })
        .collect()
}
