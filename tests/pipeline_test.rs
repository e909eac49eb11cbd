use chrono::NaiveDate;
use std::collections::HashSet;
use std::io::Write;
use tempfile::NamedTempFile;
use trade_dashboard::data::{
    self, CategoryField, CategoryFilter, FilterCriteria, FilterError, LoadOptions, LoaderError,
};

const HEADER: &str =
    "Transaction_ID,Date,Country,Import_Export,Shipping_Method,Payment_Terms,Quantity,Value,Port";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn write_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn three_rows() -> NamedTempFile {
    write_csv(&[
        "T1,01-01-2023,India,Export,Air,Net 30,10,100,PortA",
        "T2,05-01-2023,China,Import,Sea,Net 60,5,50,PortB",
        "T3,01-02-2023,India,Export,Air,Net 30,20,200,PortA",
    ])
}

fn mixed_rows() -> NamedTempFile {
    write_csv(&[
        "T1,01-01-2023,India,Export,Air,Net 30,10,100,PortA",
        "T2,05-01-2023,China,Import,Sea,Net 60,5,50,PortB",
        "T3,01-02-2023,India,Export,Air,Net 30,20,200,PortA",
        "T4,03-01-2023,Chile,Import,Air,Net 60,7,70,PortC",
        "T5,03-01-2023,China,Export,Land,Prepaid,3,30,PortB",
        "T6,not a date,Peru,Import,Sea,Net 30,1,10,PortA",
        "T7,15-01-2023,India,Import,Sea,Prepaid,9,90,PortC",
    ])
}

fn january(dataset_criteria: FilterCriteria) -> FilterCriteria {
    FilterCriteria {
        start_date: date(2023, 1, 1),
        end_date: date(2023, 1, 31),
        ..dataset_criteria
    }
}

#[test]
fn january_filter_keeps_first_two_rows() {
    let file = three_rows();
    let dataset = data::load(file.path(), &LoadOptions::default()).unwrap();
    assert_eq!(dataset.len(), 3);

    let view = data::apply(&dataset, &january(FilterCriteria::covering(&dataset))).unwrap();
    let transactions = view.transactions().unwrap();
    let mut dates: Vec<NaiveDate> = transactions.iter().filter_map(|t| t.date).collect();
    dates.sort();
    assert_eq!(dates, vec![date(2023, 1, 1), date(2023, 1, 5)]);

    let over_time = data::value_over_time(&view).unwrap();
    let points: Vec<(NaiveDate, f64)> = over_time.iter().map(|p| (p.date, p.total)).collect();
    assert_eq!(points, vec![(date(2023, 1, 1), 100.0), (date(2023, 1, 5), 50.0)]);
}

#[test]
fn air_filter_sums_india_exports() {
    let file = three_rows();
    let dataset = data::load(file.path(), &LoadOptions::default()).unwrap();
    let criteria = FilterCriteria {
        shipping_method: CategoryFilter::Only("Air".into()),
        ..FilterCriteria::covering(&dataset)
    };
    let view = data::apply(&dataset, &criteria).unwrap();

    let groups = data::value_by_country_and_direction(&view).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key, "India");
    assert_eq!(groups[0].direction, "Export");
    assert_eq!(groups[0].total, 300.0);
}

#[test]
fn unknown_category_gives_empty_results() {
    let file = three_rows();
    let dataset = data::load(file.path(), &LoadOptions::default()).unwrap();
    let criteria = FilterCriteria {
        payment_terms: CategoryFilter::Only("Net 90".into()),
        ..FilterCriteria::covering(&dataset)
    };
    let view = data::apply(&dataset, &criteria).unwrap();

    assert!(view.is_empty());
    assert!(data::value_by_country_and_direction(&view).unwrap().is_empty());
    assert!(data::value_over_time(&view).unwrap().is_empty());
    assert!(data::quantity_by_port_and_direction(&view).unwrap().is_empty());
    assert!(data::category_frequency(&view, CategoryField::ShippingMethod)
        .unwrap()
        .is_empty());
}

#[test]
fn filtered_rows_are_a_subset() {
    let file = mixed_rows();
    let dataset = data::load(file.path(), &LoadOptions::default()).unwrap();
    let all: HashSet<u64> = dataset.row_ids().unwrap().into_iter().collect();

    let criteria = FilterCriteria {
        shipping_method: CategoryFilter::Only("Air".into()),
        ..january(FilterCriteria::covering(&dataset))
    };
    let view = data::apply(&dataset, &criteria).unwrap();
    let ids = view.row_ids().unwrap();
    assert_eq!(ids.len(), 2);
    assert!(ids.iter().all(|id| all.contains(id)));
}

#[test]
fn category_filters_commute() {
    let file = mixed_rows();
    let dataset = data::load(file.path(), &LoadOptions::default()).unwrap();
    let covering = FilterCriteria::covering(&dataset);

    // Shipping first, then payment on top of it
    let shipping_only = FilterCriteria {
        shipping_method: CategoryFilter::Only("Sea".into()),
        ..covering.clone()
    };
    let both = FilterCriteria {
        payment_terms: CategoryFilter::Only("Prepaid".into()),
        ..shipping_only.clone()
    };
    let payment_only = FilterCriteria {
        payment_terms: CategoryFilter::Only("Prepaid".into()),
        ..covering
    };

    let mut a = data::apply(&dataset, &both).unwrap().row_ids().unwrap();
    let mut b: Vec<u64> = {
        let shipping_ids: HashSet<u64> = data::apply(&dataset, &shipping_only)
            .unwrap()
            .row_ids()
            .unwrap()
            .into_iter()
            .collect();
        data::apply(&dataset, &payment_only)
            .unwrap()
            .row_ids()
            .unwrap()
            .into_iter()
            .filter(|id| shipping_ids.contains(id))
            .collect()
    };
    a.sort_unstable();
    b.sort_unstable();
    assert_eq!(a, b);
    assert_eq!(a.len(), 1);
}

#[test]
fn frequencies_and_sums_agree_with_the_view() {
    let file = mixed_rows();
    let dataset = data::load(file.path(), &LoadOptions::default()).unwrap();
    let view = data::apply(&dataset, &FilterCriteria::covering(&dataset)).unwrap();
    // The unparseable date is outside every range
    assert_eq!(view.len(), 6);

    for field in [
        CategoryField::ShippingMethod,
        CategoryField::PaymentTerms,
        CategoryField::Country,
        CategoryField::Port,
    ] {
        let counts = data::category_frequency(&view, field).unwrap();
        assert_eq!(counts.iter().map(|c| c.count).sum::<u64>(), view.len() as u64);
    }

    let direct: f64 = view
        .transactions()
        .unwrap()
        .iter()
        .filter_map(|t| t.value)
        .sum();
    let grouped: f64 = data::value_by_country_and_direction(&view)
        .unwrap()
        .iter()
        .map(|g| g.total)
        .sum();
    assert!((direct - grouped).abs() < 1e-9);

    let ports = data::quantity_by_port_and_direction(&view).unwrap();
    let keys: Vec<(&str, &str)> = ports
        .iter()
        .map(|g| (g.key.as_str(), g.direction.as_str()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn same_day_values_are_merged() {
    let file = mixed_rows();
    let dataset = data::load(file.path(), &LoadOptions::default()).unwrap();
    let view = data::apply(&dataset, &FilterCriteria::covering(&dataset)).unwrap();

    let series = data::value_over_time(&view).unwrap();
    let third = series.iter().find(|p| p.date == date(2023, 1, 3)).unwrap();
    assert_eq!(third.total, 100.0);
    assert!(series.windows(2).all(|w| w[0].date < w[1].date));
}

#[test]
fn repeated_filtering_is_identical() {
    let file = mixed_rows();
    let dataset = data::load(file.path(), &LoadOptions::default()).unwrap();
    let criteria = january(FilterCriteria::covering(&dataset));

    let first = data::apply(&dataset, &criteria).unwrap();
    let second = data::apply(&dataset, &criteria).unwrap();
    assert_eq!(first.transactions().unwrap(), second.transactions().unwrap());
    assert_eq!(
        data::category_frequency(&first, CategoryField::PaymentTerms).unwrap(),
        data::category_frequency(&second, CategoryField::PaymentTerms).unwrap()
    );
}

#[test]
fn inverted_range_is_rejected() {
    let file = three_rows();
    let dataset = data::load(file.path(), &LoadOptions::default()).unwrap();
    let criteria = FilterCriteria {
        start_date: date(2023, 2, 1),
        end_date: date(2023, 1, 1),
        ..FilterCriteria::covering(&dataset)
    };
    assert!(matches!(
        data::apply(&dataset, &criteria),
        Err(FilterError::InvalidRange { .. })
    ));
}

#[test]
fn sample_is_reproducible_across_loads() {
    let file = mixed_rows();
    let options = LoadOptions {
        sample_size: 4,
        ..LoadOptions::default()
    };
    let first = data::load(file.path(), &options).unwrap();
    let second = data::load(file.path(), &options).unwrap();
    assert_eq!(first.len(), 4);
    assert_eq!(first.row_ids().unwrap(), second.row_ids().unwrap());
}

#[test]
fn missing_column_is_a_schema_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Date,Country,Import_Export,Shipping_Method,Payment_Terms,Quantity,Value").unwrap();
    writeln!(file, "01-01-2023,India,Export,Air,Net 30,10,100").unwrap();
    file.flush().unwrap();

    match data::load(file.path(), &LoadOptions::default()) {
        Err(LoaderError::SchemaError { missing }) => assert_eq!(missing, vec!["Port".to_string()]),
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn value_named_all_is_an_ordinary_category() {
    let file = write_csv(&[
        "T1,01-01-2023,India,Export,All,Net 30,10,100,PortA",
        "T2,05-01-2023,China,Import,Sea,Net 60,5,50,PortB",
    ]);
    let dataset = data::load(file.path(), &LoadOptions::default()).unwrap();
    let criteria = FilterCriteria {
        shipping_method: CategoryFilter::Only("All".into()),
        ..FilterCriteria::covering(&dataset)
    };
    let view = data::apply(&dataset, &criteria).unwrap();
    assert_eq!(view.len(), 1);
    assert_eq!(view.transactions().unwrap()[0].country.as_deref(), Some("India"));
}
