use routebake::pipeline::naming::{TransportType, resolve};

#[test]
fn tram_test() {
    let resolved = resolve("Тр5");
    assert_eq!(resolved.transport_type, TransportType::Tram);
    assert_eq!(resolved.name, "5");
}

#[test]
fn trolleybus_test() {
    let resolved = resolve("Т5");
    assert_eq!(resolved.transport_type, TransportType::Trolleybuses);
    assert_eq!(resolved.name, "5");
}

#[test]
fn taxi_test() {
    let resolved = resolve("А12");
    assert_eq!(resolved.transport_type, TransportType::Taxi);
    assert_eq!(resolved.name, "12");
}

#[test]
fn plain_number_is_taxi_test() {
    let resolved = resolve("33");
    assert_eq!(resolved.transport_type, TransportType::Taxi);
    assert_eq!(resolved.name, "33");
}

#[test]
fn empty_name_test() {
    let resolved = resolve("");
    assert_eq!(resolved.transport_type, TransportType::Taxi);
    assert_eq!(resolved.name, "");
}

#[test]
fn stripping_is_stable_test() {
    for raw in ["Тр5", "Т5", "А12", "Н-А7", "Тр10к", "Т3Б", "12", ""] {
        let once = resolve(raw).name;
        let twice = resolve(&once).name;
        assert_eq!(once, twice, "{raw} did not settle after one pass");
    }
}
