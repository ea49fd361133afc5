use chrono::{Local, Months};
use metalfolio::core::config::{AppConfig, HttpConfig};
use metalfolio::core::{PriceService, Vendor};
use metalfolio::providers::http::HttpPageFetcher;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

// Adds automatic logging to test
mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const BTMC_PAGE: &str = r#"<html><body><table>
        <tr><th>Sản phẩm</th><th>Thương hiệu</th><th>Hàm lượng</th><th>Mua vào</th><th>Bán ra</th></tr>
        <tr><td>NHẪN TRÒN TRƠN (Vàng Rồng Thăng Long)</td><td>BẢO TÍN MINH CHÂU</td><td>999.9</td><td>16.000</td><td>16.300</td></tr>
        <tr><td>Bạc thỏi Phú Quý 999 1 Kg</td><td>20.000.000.000</td><td>20.500.000.000</td></tr>
    </table></body></html>"#;

    pub const BTMH_PAGE: &str = r#"<table>
        <tr><td>Nhẫn ép vỉ Kim Gia Bảo 24K</td><td>15.950.000</td><td>16.250.000</td></tr>
    </table>"#;

    pub const PHU_TAI_PAGE: &str = r#"<table>
        <tr><td>Nhẫn tròn trơn 999.9</td><td>15.900</td><td>16.200</td></tr>
    </table>"#;

    pub const ANCARAT_PAGE: &str = r#"<table>
        <tr><td>Ngân Long Quảng Tiến 999 - 1 lượng</td><td>2,210,000</td><td>2,150,000</td></tr>
    </table>"#;

    pub async fn mount_page(server: &MockServer, url_path: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    /// A server hosting every vendor page; `failing` answers 500 instead.
    pub async fn create_vendor_server(failing: Option<&str>) -> MockServer {
        let server = MockServer::start().await;
        for (url_path, body) in [
            ("/btmc", BTMC_PAGE),
            ("/btmh", BTMH_PAGE),
            ("/phu_tai", PHU_TAI_PAGE),
            ("/ancarat", ANCARAT_PAGE),
        ] {
            let status = if failing == Some(url_path) { 500 } else { 200 };
            mount_page(&server, url_path, status, body).await;
        }
        server
    }

    /// Vendor section pointing every vendor at the mock server.
    pub fn vendors_yaml(base: &str) -> String {
        format!(
            r#"vendors:
  btmc:
    url: "{base}/btmc"
  phu_quy:
    url: "{base}/btmc"
  btmh:
    url: "{base}/btmh"
  phu_tai:
    url: "{base}/phu_tai"
  ancarat:
    url: "{base}/ancarat"
http:
  timeout_secs: 5
  retries: 0
  retry_delay_ms: 1
"#
        )
    }
}

fn scenario_config(base: &str) -> String {
    let purchase_date = Local::now().date_naive() - Months::new(6);
    format!(
        r#"holdings:
  existing:
    - id: "ex-gold"
      name: "Nhẫn tròn trơn"
      metal: gold
      quantity: 5
      unit: chi
      vendor: btmc
    - id: "ex-silver"
      name: "Bạc thỏi"
      metal: silver
      quantity: 2
      unit: kg
      vendor: phu_quy
  investment:
    - id: "inv-gold"
      name: "Vàng tích trữ"
      metal: gold
      quantity: 3
      unit: chi
      vendor: btmc
      purchase_price: 14500000
      purchase_date: {purchase_date}
{}"#,
        test_utils::vendors_yaml(base)
    )
}

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn service_for(config: &AppConfig) -> PriceService {
    let fetcher = Arc::new(HttpPageFetcher::new(&config.http).unwrap());
    PriceService::new(fetcher, config.vendor_urls())
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock_vendors() {
    let mock_server = test_utils::create_vendor_server(None).await;
    let config_file = write_config(&scenario_config(&mock_server.uri()));
    let config_path = config_file.path().to_str().unwrap();

    info!("Running prices and summary against {}", mock_server.uri());
    let result = metalfolio::run_command(metalfolio::AppCommand::Prices, Some(config_path)).await;
    assert!(result.is_ok(), "prices failed: {result:?}");

    let result = metalfolio::run_command(
        metalfolio::AppCommand::Summary { json: true },
        Some(config_path),
    )
    .await;
    assert!(result.is_ok(), "summary failed: {result:?}");
}

#[test_log::test(tokio::test)]
async fn test_portfolio_valuation_end_to_end() {
    let mock_server = test_utils::create_vendor_server(None).await;
    let config_file = write_config(&scenario_config(&mock_server.uri()));
    let config = AppConfig::load_from_path(config_file.path()).unwrap();
    let service = service_for(&config);

    let results = service.refresh_all().await;
    assert!(results.values().all(Option::is_some), "{results:?}");
    assert_eq!(
        results[&Vendor::BaoTinMinhChau].as_ref().unwrap().buy_price,
        16_000_000.0
    );
    assert_eq!(
        results[&Vendor::PhuQuy].as_ref().unwrap().buy_price,
        20_000_000_000.0
    );
    assert_eq!(
        results[&Vendor::Ancarat].as_ref().unwrap().buy_price,
        2_150_000.0
    );

    let report = metalfolio::cli::summary::build_report(&service, &config)
        .await
        .unwrap();
    let summary = &report.summary;
    assert!(report.skipped.is_empty());
    assert_eq!(summary.total_existing_value, 40_080_000_000.0);
    assert_eq!(summary.total_investment_value, 48_000_000.0);
    assert_eq!(summary.total_value, 40_128_000_000.0);
    assert_eq!(summary.total_gold_value, 128_000_000.0);
    assert_eq!(summary.total_silver_value, 40_000_000_000.0);
    assert_eq!(summary.total_profit_loss, 4_500_000.0);
    assert_eq!(summary.total_profit_loss_percent, 10.34);

    let months = report.investment[0].holding_months.unwrap();
    assert!((5.9..=6.1).contains(&months), "holding months {months}");
}

#[test_log::test(tokio::test)]
async fn test_failing_vendor_is_isolated() {
    let mock_server = test_utils::create_vendor_server(Some("/ancarat")).await;
    let config_file = write_config(&test_utils::vendors_yaml(&mock_server.uri()));
    let config = AppConfig::load_from_path(config_file.path()).unwrap();
    let service = service_for(&config);

    let results = service.refresh_all().await;
    assert_eq!(results.len(), Vendor::ALL.len());
    assert!(results[&Vendor::Ancarat].is_none());
    for vendor in [
        Vendor::BaoTinMinhChau,
        Vendor::BaoTinManhHai,
        Vendor::PhuQuy,
        Vendor::PhuTai,
    ] {
        assert!(results[&vendor].is_some(), "{vendor} should have a quote");
    }

    assert!(service.get_cached_quote(Vendor::Ancarat).await.is_none());
    assert_eq!(service.get_all_cached_quotes().await.len(), 4);
    assert!(service.get_last_refresh_timestamp().await.is_some());
    assert_eq!(service.get_history(None, None).await.len(), 4);
}

#[test_log::test(tokio::test)]
async fn test_timed_out_vendors_are_marked_failed() {
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(test_utils::BTMC_PAGE)
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let yaml =
        test_utils::vendors_yaml(&mock_server.uri()).replace("timeout_secs: 5", "timeout_secs: 1");
    let config_file = write_config(&yaml);
    let config = AppConfig::load_from_path(config_file.path()).unwrap();
    assert_eq!(config.http.timeout_secs, 1);
    let service = service_for(&config);

    let started = std::time::Instant::now();
    let results = service.refresh_all().await;
    info!(elapsed = ?started.elapsed(), "Refresh finished");

    assert!(started.elapsed() < std::time::Duration::from_secs(3));
    assert_eq!(results.len(), Vendor::ALL.len());
    assert!(results.values().all(Option::is_none), "{results:?}");
    assert!(service.get_all_cached_quotes().await.is_empty());
    assert!(service.get_last_refresh_timestamp().await.is_some());
}

#[test_log::test(tokio::test)]
async fn test_unreachable_vendors_do_not_fail_refresh() {
    let config = AppConfig {
        vendors: HashMap::new(),
        http: HttpConfig {
            timeout_secs: 1,
            retries: 0,
            retry_delay_ms: 1,
        },
        ..Default::default()
    };
    let urls = Vendor::ALL
        .into_iter()
        .map(|v| (v, "http://127.0.0.1:9/".to_string()))
        .collect();
    let fetcher = Arc::new(HttpPageFetcher::new(&config.http).unwrap());
    let service = PriceService::new(fetcher, urls);

    let results = service.refresh_all().await;
    assert!(results.values().all(Option::is_none));
    assert!(service.get_all_cached_quotes().await.is_empty());
    assert!(service.get_last_refresh_timestamp().await.is_some());
}
