//! One entry point per dashboard tab. Each takes the unified table and the
//! tab's selections and returns display-ready values.

use serde::Serialize;

use super::leaderboard::{Extremum, Leaderboard, Standing};
use super::options::{distinct_values, indicator_options, sector_options, Options, SectorChoice};
use super::shape::{breakdown, time_series};
use super::stats::{mean, Mean};
use crate::chart::{Axes, BarChart, Chart, LineChart, Series};
use crate::color::{self, ColorMap};
use crate::config::DashboardConfig;
use crate::data::filter::{Condition, Field, Filter};
use crate::data::model::{Dataset, Record, YearRange};

pub const EMPLOYMENT: &str = "Employment";
pub const SENIOR_MANAGEMENT: &str = "Senior Management";
pub const INNOVATION: &str = "Innovation";
pub const ENTREPRENEURSHIP: &str = "Entrepreneurship";

const WAGE_GAP: &str = "wage gap";
const CONTRACT_OR_OCCUPATION: &str = "contract|occupation";
const SENIOR_MANAGERS: &str = "Share of female senior managers";
const FEMALE_INVENTORS: &str = "female inventors";
const GENDER_DIVERSE: &str = "gender diverse";

const NO_DATA: &str = "No data available";

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

/// Headline statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    pub label: String,
    /// `None` means no data, which is distinct from a zero average.
    pub value: Option<f64>,
    pub count: usize,
    pub text: String,
}

impl Kpi {
    fn new(icon: &str, label: &str, summary: Option<Mean>) -> Self {
        let text = match summary {
            Some(m) => format!("{icon} {label}: {:.2}%", m.value),
            None => format!("{icon} No data"),
        };
        Kpi {
            label: label.to_string(),
            value: summary.map(|m| m.value),
            count: summary.map_or(0, |m| m.count),
            text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewKpis {
    pub wage_gap: Kpi,
    pub senior_roles: Kpi,
    pub female_inventors: Kpi,
    pub diverse_founders: Kpi,
}

/// The four headline KPIs for one country over an inclusive year range.
pub fn overview(dataset: &Dataset, country: &str, years: YearRange) -> OverviewKpis {
    let scope = Filter::new().country(country).years(years).apply(dataset.records());
    log::debug!("overview {country} {years:?}: {} rows", scope.len());

    let summarize = |filter: Filter| mean(filter.apply(scope.iter().copied()));

    OverviewKpis {
        wage_gap: Kpi::new(
            "📊",
            "Avg Gender Wage Gap",
            summarize(Filter::new().indicator_contains(WAGE_GAP)),
        ),
        senior_roles: Kpi::new(
            "👩‍💼",
            "% Women in Senior Roles",
            summarize(
                Filter::new()
                    .topic(SENIOR_MANAGEMENT)
                    .with(Condition::equals_ignore_case(Field::IndicatorCategory, "women")),
            ),
        ),
        female_inventors: Kpi::new(
            "💡",
            "% Female Inventors",
            summarize(Filter::new().topic(INNOVATION).indicator_contains(FEMALE_INVENTORS)),
        ),
        diverse_founders: Kpi::new(
            "🚀",
            "% Gender-Diverse Founders",
            summarize(
                Filter::new()
                    .topic(ENTREPRENEURSHIP)
                    .indicator_contains(GENDER_DIVERSE),
            ),
        ),
    }
}

// ---------------------------------------------------------------------------
// Employment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmploymentView {
    pub wage_trend: Chart,
    pub gap_breakdown: Chart,
}

/// Wage-gap trend and contract/occupation gaps. Values outside
/// `(-outlier_bound, outlier_bound)` are discarded first.
pub fn employment(dataset: &Dataset, country: &str, config: &DashboardConfig) -> EmploymentView {
    let rows = Filter::new().country(country).topic(EMPLOYMENT).apply(dataset.records());
    let guard = Filter::new().value_within(config.outlier_bound);

    let wage = guard
        .clone()
        .indicator_contains(WAGE_GAP)
        .apply(rows.iter().copied());
    let wage_trend = match time_series(&wage) {
        None => Chart::no_data(
            format!("No Data Available for {country} in this Period"),
            "No data found for wage gap indicators",
        ),
        Some(points) => Chart::Line(LineChart {
            title: format!("Average Gender Wage Gap Over Time in {country}"),
            axes: Axes::new("Year", "Wage Gap (%)"),
            series: vec![Series {
                name: "Avg Wage Gap (%)".into(),
                color: color::BLUE.into(),
                points,
            }],
        }),
    };

    let gaps = guard
        .indicator_contains(CONTRACT_OR_OCCUPATION)
        .apply(rows.iter().copied());
    let gap_breakdown = match breakdown(&gaps, Field::Indicator) {
        None => Chart::no_data(format!("No contract/occupation data for {country}"), NO_DATA),
        Some(bars) => Chart::Bar(BarChart {
            title: format!("Employment Gaps by Type in {country}"),
            axes: Axes::new("Indicator", "Gap (%)").slanted(),
            name: "Gap (%)".into(),
            bars,
        }),
    };

    EmploymentView {
        wage_trend,
        gap_breakdown,
    }
}

// ---------------------------------------------------------------------------
// Senior management
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeniorManagementView {
    pub role_breakdown: Chart,
    /// One line per role, coloured like the role's bar.
    pub role_trend: Chart,
}

pub fn senior_management(dataset: &Dataset, country: &str) -> SeniorManagementView {
    let rows = Filter::new()
        .country(country)
        .topic(SENIOR_MANAGEMENT)
        .indicator_contains(SENIOR_MANAGERS)
        .apply(dataset.records());
    if rows.is_empty() {
        return SeniorManagementView {
            role_breakdown: Chart::no_data(
                format!("No senior management data for {country}"),
                NO_DATA,
            ),
            role_trend: Chart::no_data(format!("No time series data for {country}"), NO_DATA),
        };
    }

    let roles = distinct_values(&rows, Field::IndicatorCategory);
    let colors = ColorMap::new(&roles);

    let mut bars = breakdown(&rows, Field::IndicatorCategory).unwrap_or_default();
    for bar in &mut bars {
        bar.color = Some(colors.color_for(&bar.category).to_string());
    }
    let role_breakdown = Chart::Bar(BarChart {
        title: format!("% of Women in Senior Roles – {country}"),
        axes: Axes::new("Role", "Percentage"),
        name: "Women (%)".into(),
        bars,
    });

    let series = roles
        .iter()
        .map(|role| {
            let role_rows = Filter::new()
                .with(Condition::equals(Field::IndicatorCategory, role))
                .apply(rows.iter().copied());
            Series {
                name: role.clone(),
                color: colors.color_for(role).to_string(),
                points: time_series(&role_rows).unwrap_or_default(),
            }
        })
        .collect();
    let role_trend = Chart::Line(LineChart {
        title: format!("Women in Senior Roles Over Time – {country}"),
        axes: Axes::new("Year", "% of Women"),
        series,
    });

    SeniorManagementView {
        role_breakdown,
        role_trend,
    }
}

// ---------------------------------------------------------------------------
// Innovation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InnovationView {
    /// Sector selector contents, computed before the sector filter applies.
    pub sector_options: Vec<SectorChoice>,
    pub tech_breakdown: Chart,
    pub trend: Chart,
}

fn female_inventor_rows<'a>(dataset: &'a Dataset, country: &str) -> Vec<&'a Record> {
    Filter::new()
        .country(country)
        .topic(INNOVATION)
        .indicator_contains(FEMALE_INVENTORS)
        .apply(dataset.records())
}

/// Sector selector contents for one country's innovation tab.
pub fn innovation_sectors(dataset: &Dataset, country: &str) -> Vec<SectorChoice> {
    sector_options(&female_inventor_rows(dataset, country))
}

pub fn innovation(dataset: &Dataset, country: &str, sector: &SectorChoice) -> InnovationView {
    let rows = female_inventor_rows(dataset, country);
    let sector_options = sector_options(&rows);

    let rows = match sector {
        SectorChoice::All => rows,
        SectorChoice::Sector(name) => Filter::new()
            .with(Condition::equals(Field::TechnologyOrSector, name))
            .apply(rows),
    };

    let tech_breakdown = match breakdown(&rows, Field::TechnologyOrSector) {
        None => Chart::no_data(format!("No innovation data for {country}"), NO_DATA),
        Some(bars) => Chart::Bar(BarChart {
            title: format!("% Female Inventors by Technology – {country}"),
            axes: Axes::new("Technology", "% Female Inventors").slanted(),
            name: "Female Inventors (%)".into(),
            bars,
        }),
    };

    let trend = match time_series(&rows) {
        None => Chart::no_data(format!("No innovation data for {country}"), NO_DATA),
        Some(points) => Chart::Line(LineChart {
            title: format!("% Female Inventors Over Time – {country} ({sector})"),
            axes: Axes::new("Year", "% Female Inventors"),
            series: vec![Series {
                name: "% Female Inventors".into(),
                color: color::GREEN.into(),
                points,
            }],
        }),
    };

    InnovationView {
        sector_options,
        tech_breakdown,
        trend,
    }
}

// ---------------------------------------------------------------------------
// Entrepreneurship
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrepreneurshipView {
    pub sector_breakdown: Chart,
    pub trend: Chart,
}

pub fn entrepreneurship(dataset: &Dataset, country: &str) -> EntrepreneurshipView {
    let rows = Filter::new()
        .country(country)
        .topic(ENTREPRENEURSHIP)
        .indicator_contains(GENDER_DIVERSE)
        .apply(dataset.records());

    let sector_breakdown = match breakdown(&rows, Field::TechnologyOrSector) {
        None => Chart::no_data(format!("No entrepreneurship data for {country}"), NO_DATA),
        Some(bars) => Chart::Bar(BarChart {
            title: format!("% Gender-Diverse Founders by Sector – {country}"),
            axes: Axes::new("Sector", "% Gender-Diverse Founders").slanted(),
            name: "Gender-Diverse Founders (%)".into(),
            bars,
        }),
    };

    let trend = match time_series(&rows) {
        None => Chart::no_data(format!("No entrepreneurship data for {country}"), NO_DATA),
        Some(points) => Chart::Line(LineChart {
            title: format!("% Gender-Diverse Founders Over Time – {country}"),
            axes: Axes::new("Year", "% Gender-Diverse Founders"),
            series: vec![Series {
                name: "% Gender-Diverse Founders".into(),
                color: color::PURPLE.into(),
                points,
            }],
        }),
    };

    EntrepreneurshipView {
        sector_breakdown,
        trend,
    }
}

// ---------------------------------------------------------------------------
// Explorer
// ---------------------------------------------------------------------------

/// Indicator selector contents for the explorer tab.
pub fn explorer_options(dataset: &Dataset, country: &str, topic: &str) -> Options {
    indicator_options(dataset, country, topic)
}

/// Yearly trend of one exact indicator. No indicator chosen yet is the same
/// outcome as an empty selection.
pub fn explorer_trend(
    dataset: &Dataset,
    country: &str,
    topic: &str,
    indicator: Option<&str>,
) -> Chart {
    let Some(indicator) = indicator else {
        return Chart::no_data(NO_DATA, NO_DATA);
    };
    let rows = Filter::new()
        .country(country)
        .topic(topic)
        .indicator(indicator)
        .apply(dataset.records());

    match time_series(&rows) {
        None => Chart::no_data(NO_DATA, NO_DATA),
        Some(points) => Chart::Line(LineChart {
            title: format!("{indicator} Over Time – {country} ({topic})"),
            axes: Axes::new("Year", indicator),
            series: vec![Series {
                name: indicator.to_string(),
                color: color::ORANGE.into(),
                points,
            }],
        }),
    }
}

// ---------------------------------------------------------------------------
// Advanced insights
// ---------------------------------------------------------------------------

/// Leaderboard outcome with its display sentence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    /// `None` when no country met the sample threshold.
    pub standing: Option<Standing>,
    pub text: String,
}

impl Insight {
    fn new(standing: Option<Standing>, icon: &str, headline: &str, subject: &str) -> Self {
        let text = match &standing {
            Some(s) => format!("{icon} {headline}: {} ({:.2}%)", s.country, s.mean),
            None => format!("{icon} No country with sufficient data for {subject}"),
        };
        Insight { standing, text }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvancedInsights {
    pub senior_roles: Insight,
    pub female_inventors: Insight,
    pub wage_gap: Insight,
    pub diverse_founders: Insight,
}

/// Best and worst countries across the configured allow-list.
pub fn advanced_insights(dataset: &Dataset, config: &DashboardConfig) -> AdvancedInsights {
    let rank = |topic: &str, pattern: &str, extremum: Extremum| {
        Leaderboard {
            filter: Filter::new().topic(topic).indicator_contains(pattern),
            countries: config.leaderboard_countries.clone(),
            min_samples: config.min_samples,
            extremum,
        }
        .winner(dataset)
    };

    AdvancedInsights {
        senior_roles: Insight::new(
            rank(SENIOR_MANAGEMENT, SENIOR_MANAGERS, Extremum::Max),
            "🏆",
            "Country with Highest % Women in Senior Roles",
            "Senior Roles",
        ),
        female_inventors: Insight::new(
            rank(INNOVATION, FEMALE_INVENTORS, Extremum::Max),
            "💡",
            "Country with Highest % Female Inventors",
            "Female Inventors",
        ),
        wage_gap: Insight::new(
            rank(EMPLOYMENT, WAGE_GAP, Extremum::Min),
            "⚠️",
            "Country with Largest Gender Wage Gap",
            "Wage Gap",
        ),
        diverse_founders: Insight::new(
            rank(ENTREPRENEURSHIP, GENDER_DIVERSE, Extremum::Max),
            "🚀",
            "Country with Highest % Gender-Diverse Founders",
            "Gender-Diverse Founders",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{dataset, record, with_category, with_sector};
    use crate::query::shape::YearPoint;

    fn sample() -> Dataset {
        let mut rows = vec![
            record("France", 2015, EMPLOYMENT, "Gender wage gap", Some(10.0)),
            record("France", 2016, EMPLOYMENT, "Gender wage gap", Some(20.0)),
            record("France", 2016, EMPLOYMENT, "Gender wage gap", Some(150.0)),
            record("France", 2016, EMPLOYMENT, "Gap by contract type", Some(4.0)),
            record("France", 2017, EMPLOYMENT, "Gap by occupation", Some(6.0)),
            with_category(
                record("France", 2015, SENIOR_MANAGEMENT, "Share of female senior managers", Some(30.0)),
                "Women",
            ),
            with_category(
                record("France", 2016, SENIOR_MANAGEMENT, "Share of female senior managers", Some(40.0)),
                "Board members",
            ),
            with_sector(
                record("France", 2015, INNOVATION, "Share of female inventors", Some(12.0)),
                "Solar",
            ),
            with_sector(
                record("France", 2016, INNOVATION, "Share of female inventors", Some(18.0)),
                "Wind",
            ),
            with_sector(
                record("France", 2016, ENTREPRENEURSHIP, "Gender diverse founding teams", Some(25.0)),
                "Hydrogen",
            ),
        ];
        rows.push(record("Spain", 2015, EMPLOYMENT, "Gender wage gap", Some(-3.0)));
        dataset(rows)
    }

    #[test]
    fn overview_reports_each_kpi() {
        let ds = sample();
        let kpis = overview(&ds, "France", YearRange::new(2015, 2016));

        // 10, 20 and 150 inside 2015-2016; no outlier guard on the overview.
        assert_eq!(kpis.wage_gap.value, Some(60.0));
        assert_eq!(kpis.wage_gap.text, "📊 Avg Gender Wage Gap: 60.00%");
        assert_eq!(kpis.senior_roles.value, Some(30.0));
        assert_eq!(kpis.female_inventors.value, Some(15.0));
        assert_eq!(kpis.diverse_founders.value, Some(25.0));
    }

    #[test]
    fn overview_without_rows_says_no_data() {
        let ds = sample();
        let kpis = overview(&ds, "Germany", YearRange::new(2000, 2030));
        assert_eq!(kpis.wage_gap.value, None);
        assert_eq!(kpis.wage_gap.count, 0);
        assert_eq!(kpis.wage_gap.text, "📊 No data");
        assert_eq!(kpis.diverse_founders.text, "🚀 No data");
    }

    #[test]
    fn employment_drops_outliers_and_groups_gaps() {
        let ds = sample();
        let view = employment(&ds, "France", &DashboardConfig::default());

        let Chart::Line(line) = &view.wage_trend else {
            panic!("expected line chart, got {:?}", view.wage_trend);
        };
        assert_eq!(
            line.series[0].points,
            vec![
                YearPoint { year: 2015, value: 10.0 },
                YearPoint { year: 2016, value: 20.0 },
            ]
        );

        let Chart::Bar(bar) = &view.gap_breakdown else {
            panic!("expected bar chart");
        };
        let categories: Vec<&str> = bar.bars.iter().map(|b| b.category.as_str()).collect();
        assert_eq!(categories, vec!["Gap by contract type", "Gap by occupation"]);
    }

    #[test]
    fn employment_for_unknown_country_is_placeholder() {
        let ds = sample();
        let view = employment(&ds, "Narnia", &DashboardConfig::default());
        assert!(view.wage_trend.is_no_data());
        assert_eq!(view.wage_trend.title(), "No Data Available for Narnia in this Period");
        assert!(view.gap_breakdown.is_no_data());
    }

    #[test]
    fn senior_roles_share_colours_between_charts() {
        let ds = sample();
        let view = senior_management(&ds, "France");

        let (Chart::Bar(bar), Chart::Line(line)) = (&view.role_breakdown, &view.role_trend) else {
            panic!("expected bar and line charts");
        };
        assert_eq!(bar.bars.len(), 2);
        assert_eq!(line.series.len(), 2);
        for series in &line.series {
            let matching = bar.bars.iter().find(|b| b.category == series.name).unwrap();
            assert_eq!(matching.color.as_deref(), Some(series.color.as_str()));
        }
    }

    #[test]
    fn innovation_sector_filter_keeps_full_option_list() {
        let ds = sample();
        let view = innovation(&ds, "France", &SectorChoice::Sector("Wind".into()));

        assert_eq!(view.sector_options.len(), 3);
        let Chart::Bar(bar) = &view.tech_breakdown else {
            panic!("expected bar chart");
        };
        assert_eq!(bar.bars.len(), 1);
        assert_eq!(bar.bars[0].category, "Wind");
        assert_eq!(view.trend.title(), "% Female Inventors Over Time – France (Wind)");
    }

    #[test]
    fn entrepreneurship_without_rows_is_placeholder() {
        let ds = sample();
        assert!(!entrepreneurship(&ds, "France").trend.is_no_data());
        let empty = entrepreneurship(&ds, "Spain");
        assert!(empty.trend.is_no_data());
        assert!(empty.sector_breakdown.is_no_data());
    }

    #[test]
    fn explorer_needs_an_indicator() {
        let ds = sample();
        assert!(explorer_trend(&ds, "France", EMPLOYMENT, None).is_no_data());

        let opts = explorer_options(&ds, "France", EMPLOYMENT);
        let chart = explorer_trend(&ds, "France", EMPLOYMENT, opts.selected.as_deref());
        let Chart::Line(line) = chart else {
            panic!("expected line chart");
        };
        assert_eq!(line.series[0].name, "Gap by contract type");
    }

    #[test]
    fn insights_without_enough_samples_explain_themselves() {
        let ds = sample();
        let insights = advanced_insights(&ds, &DashboardConfig::default());
        assert_eq!(insights.wage_gap.standing, None);
        assert_eq!(
            insights.wage_gap.text,
            "⚠️ No country with sufficient data for Wage Gap"
        );
    }

    #[test]
    fn insights_pick_most_negative_wage_gap() {
        let mut rows = Vec::new();
        for year in 2010..2015 {
            rows.push(record("France", year, EMPLOYMENT, "Gender wage gap", Some(-5.0)));
            rows.push(record("Spain", year, EMPLOYMENT, "Gender wage gap", Some(-12.0)));
        }
        let ds = dataset(rows);

        let insights = advanced_insights(&ds, &DashboardConfig::default());

        let standing = insights.wage_gap.standing.unwrap();
        assert_eq!(standing.country, "Spain");
        assert_eq!(
            insights.wage_gap.text,
            "⚠️ Country with Largest Gender Wage Gap: Spain (-12.00%)"
        );
    }
}
