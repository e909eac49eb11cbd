use std::io::Write;
use tempfile::{tempdir, NamedTempFile};
use trade_dashboard::charts::{ChartData, DashboardLayout, StaticChartRenderer, CHARTS};
use trade_dashboard::data::{self, CategoryFilter, FilterCriteria, LoadOptions};

fn trades() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "Transaction_ID,Date,Country,Import_Export,Shipping_Method,Payment_Terms,Quantity,Value,Port"
    )
    .unwrap();
    for row in [
        "T1,01-01-2023,India,Export,Air,Net 30,10,100.5,PortA",
        "T2,05-01-2023,China,Import,Sea,Net 60,5,50,PortB",
        "T3,01-02-2023,India,Export,Air,Net 30,20,200,PortA",
        "T4,17-03-2023,Chile,Import,Land,Prepaid,7,70.25,PortC",
        "T5,17-03-2023,China,Export,Sea,Net 60,12,130,PortB",
    ] {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn extended_layout_renders_one_png_per_chart() {
    let source = trades();
    let dataset = data::load(source.path(), &LoadOptions::default()).unwrap();
    let view = data::apply(&dataset, &FilterCriteria::covering(&dataset)).unwrap();
    let charts = ChartData::build_all(DashboardLayout::Extended.charts(), &view).unwrap();

    let dir = tempdir().unwrap();
    let out = dir.path().join("charts");
    let paths = StaticChartRenderer::render_all(&charts, &out, (640, 480)).unwrap();

    assert_eq!(paths.len(), 8);
    for descriptor in CHARTS.iter() {
        let png = out.join(format!("{}.png", descriptor.id));
        assert!(paths.contains(&png), "missing {}", png.display());
        assert!(std::fs::metadata(&png).unwrap().len() > 0);
    }
}

#[test]
fn empty_view_still_renders_every_chart() {
    let source = trades();
    let dataset = data::load(source.path(), &LoadOptions::default()).unwrap();
    let criteria = FilterCriteria {
        shipping_method: CategoryFilter::Only("Rail".into()),
        ..FilterCriteria::covering(&dataset)
    };
    let view = data::apply(&dataset, &criteria).unwrap();
    assert!(view.is_empty());

    let charts = ChartData::build_all(DashboardLayout::Extended.charts(), &view).unwrap();
    assert!(charts.iter().all(|c| c.series.is_empty()));

    let dir = tempdir().unwrap();
    let paths = StaticChartRenderer::render_all(&charts, dir.path(), (320, 240)).unwrap();
    assert_eq!(paths.len(), CHARTS.len());
    assert!(paths.iter().all(|p| p.exists()));
}
