//! Behaviour every backend must share, instantiated per backend with
//! `contract_suite!`.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::MutexGuard;

use edgevault::model::collection;
use edgevault::model::{
    now_millis, Action, Addressable, Command, Device, DeviceProfile, DeviceReport, DeviceService,
    Event, Id, ProvisionWatcher, Reading, Registration, Schedule, ScheduleEvent, ValueDescriptor,
};
use edgevault::{Database, ErrorKind};

/// A connected database, emptied before the case runs.
pub struct Fixture {
    db: Database,
    _serial: Option<MutexGuard<'static, ()>>,
}

impl Fixture {
    pub fn new(db: Database) -> Self {
        Self::clean(db, None)
    }

    /// Fixture holding `serial` for its whole life, for shared servers.
    pub fn serialized(db: Database, serial: MutexGuard<'static, ()>) -> Self {
        Self::clean(db, Some(serial))
    }

    fn clean(db: Database, serial: Option<MutexGuard<'static, ()>>) -> Self {
        for collection in collection::ALL {
            db.store().scrub(collection).unwrap();
        }
        Self {
            db,
            _serial: serial,
        }
    }
}

impl Deref for Fixture {
    type Target = Database;

    fn deref(&self) -> &Database {
        &self.db
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        self.db.close_session();
    }
}

/// Expands to one `#[test]` per contract case, each opening a fresh
/// fixture with `$open` (returning `None` skips the case).
macro_rules! contract_suite {
    ($open:path) => {
        contract_suite!(@cases $open;
            reading_scenario,
            reading_creation_range,
            event_population_and_queries,
            event_embeds_and_cascades,
            event_age_and_scrub,
            lookup_success_and_failures,
            duplicate_names_rejected,
            empty_names_resolve_by_scan,
            update_reflected_on_read,
            update_unknown_is_not_found,
            delete_then_read_is_not_found,
            scrub_empties_collections,
            close_session_twice,
            value_descriptor_predicates,
            reading_predicates,
            addressable_predicates,
            device_predicates,
            profile_and_command_predicates,
            report_schedule_predicates,
            provision_watcher_predicates,
            registrations,
        );
    };
    (@cases $open:path; $($case:ident),* $(,)?) => {
        $(
            #[test]
            fn $case() {
                match $open() {
                    Some(fixture) => contract::$case(&fixture),
                    None => eprintln!(
                        "skipping {}: backend not configured",
                        stringify!($case)
                    ),
                }
            }
        )*
    };
}

fn reading(device: &str, name: &str) -> Reading {
    Reading {
        device: device.to_string(),
        name: name.to_string(),
        value: "42".to_string(),
        ..Default::default()
    }
}

fn populate_readings(db: &Database) {
    for i in 0..100 {
        let name = format!("name{i}");
        db.add_reading(&reading(&name, &name)).unwrap();
    }
    for i in 0..10 {
        let name = format!("name{i}");
        db.add_reading(&reading(&name, &name)).unwrap();
    }
}

fn descriptor(name: &str, uom: &str, kind: &str, labels: &[&str]) -> ValueDescriptor {
    ValueDescriptor {
        name: name.to_string(),
        uom_label: uom.to_string(),
        kind: kind.to_string(),
        labels: labels.iter().map(|l| l.to_string()).collect(),
        ..Default::default()
    }
}

fn hex(id: Option<Id>) -> String {
    id.map(|id| id.to_hex()).unwrap_or_default()
}

pub fn reading_scenario(db: &Database) {
    populate_readings(db);

    assert_eq!(db.reading_count().unwrap(), 110);
    assert_eq!(db.readings().unwrap().len(), 110);
    assert_eq!(db.readings_by_device("name1", 10).unwrap().len(), 2);
    assert_eq!(db.readings_by_device("name1", 1).unwrap().len(), 1);
    assert_eq!(db.readings_by_device("name20", 10).unwrap().len(), 1);
    assert_eq!(db.readings_by_device("noname", 10).unwrap().len(), 0);
}

pub fn reading_creation_range(db: &Database) {
    let before = now_millis();
    populate_readings(db);
    let after = now_millis();

    let all = db.readings_by_creation_time(before, after + 10, 200).unwrap();
    assert_eq!(all.len(), 110);
    assert!(all.windows(2).all(|pair| pair[0].created <= pair[1].created));
    assert_eq!(
        db.readings_by_creation_time(before, after, 100).unwrap().len(),
        100
    );
    assert!(db
        .readings_by_creation_time(after + 1_000, after + 2_000, 10)
        .unwrap()
        .is_empty());
}

pub fn event_population_and_queries(db: &Database) {
    for i in 0..10 {
        let device = if i % 2 == 0 { "even" } else { "odd" };
        db.add_event(&Event {
            device: device.to_string(),
            readings: vec![reading(device, "temperature")],
            ..Default::default()
        })
        .unwrap();
    }

    assert_eq!(db.event_count().unwrap(), 10);
    assert_eq!(db.reading_count().unwrap(), 10);
    assert_eq!(db.events().unwrap().len(), 10);
    assert_eq!(db.events_with_limit(3).unwrap().len(), 3);
    assert_eq!(db.event_count_by_device("odd").unwrap(), 5);
    assert_eq!(db.events_for_device("even", 2).unwrap().len(), 2);
    assert_eq!(db.events_for_device("none", 2).unwrap().len(), 0);

    let events = db.events().unwrap();
    assert!(events.windows(2).all(|pair| pair[0].created <= pair[1].created));
    let first = &events[0];
    let window = db
        .events_by_creation_time(first.created, first.created, 100)
        .unwrap();
    assert!(window.iter().any(|event| event.id == first.id));
}

pub fn event_embeds_and_cascades(db: &Database) {
    let id = db
        .add_event(&Event {
            device: "d1".to_string(),
            readings: vec![reading("d1", "temperature"), reading("d1", "humidity")],
            ..Default::default()
        })
        .unwrap();
    let survivor = db.add_reading(&reading("d2", "pressure")).unwrap();

    let event = db.event_by_id(&id.to_hex()).unwrap();
    assert_eq!(event.readings.len(), 2);
    for embedded in &event.readings {
        let stored = db.reading_by_id(&hex(embedded.id)).unwrap();
        assert_eq!(&stored, embedded);
    }

    db.delete_event_by_id(&id.to_hex()).unwrap();
    assert_eq!(db.event_count().unwrap(), 0);
    assert_eq!(db.reading_count().unwrap(), 1);
    assert!(db.reading_by_id(&survivor.to_hex()).is_ok());
}

pub fn event_age_and_scrub(db: &Database) {
    let pushed = db
        .add_event(&Event {
            device: "d1".to_string(),
            ..Default::default()
        })
        .unwrap();
    db.add_event(&Event {
        device: "d1".to_string(),
        readings: vec![reading("d1", "temperature")],
        ..Default::default()
    })
    .unwrap();

    let mut event = db.event_by_id(&pushed.to_hex()).unwrap();
    event.pushed = now_millis();
    db.update_event(&event).unwrap();

    assert_eq!(db.events_pushed().unwrap().len(), 1);
    assert_eq!(db.events_older_than_age(3_600_000).unwrap().len(), 0);
    assert_eq!(db.events_older_than_age(-3_600_000).unwrap().len(), 2);
    assert_eq!(db.events_older_than_age(i64::MIN).unwrap().len(), 2);
    assert_eq!(db.events_older_than_age(i64::MAX).unwrap().len(), 0);

    db.scrub_all_events().unwrap();
    assert_eq!(db.event_count().unwrap(), 0);
    assert_eq!(db.reading_count().unwrap(), 0);
}

pub fn lookup_success_and_failures(db: &Database) {
    let id = db
        .add_value_descriptor(&descriptor("temperature", "C", "F", &[]))
        .unwrap();

    assert_eq!(
        db.value_descriptor_by_id(&id.to_hex()).unwrap().name,
        "temperature"
    );
    assert_eq!(
        hex(db.value_descriptor_by_name("temperature").unwrap().id),
        id.to_hex()
    );

    let missing = Id::generate().to_hex();
    assert_eq!(
        db.value_descriptor_by_id(&missing).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        db.value_descriptor_by_name("humidity").unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        db.value_descriptor_by_id("not-hex").unwrap_err().kind(),
        ErrorKind::InvalidId
    );
    assert_eq!(
        db.event_by_id("12345").unwrap_err().kind(),
        ErrorKind::InvalidId
    );
    assert_eq!(
        db.delete_reading_by_id("zz").unwrap_err().kind(),
        ErrorKind::InvalidId
    );
}

pub fn duplicate_names_rejected(db: &Database) {
    let before = db.value_descriptors().unwrap().len();
    db.add_value_descriptor(&descriptor("temperature", "C", "F", &[]))
        .unwrap();
    let err = db
        .add_value_descriptor(&descriptor("temperature", "K", "F", &[]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateName);
    assert_eq!(db.value_descriptors().unwrap().len(), before + 1);

    let pump = Device {
        name: "pump".to_string(),
        ..Default::default()
    };
    db.add_device(&pump).unwrap();
    assert_eq!(db.add_device(&pump).unwrap_err().kind(), ErrorKind::DuplicateName);
    assert_eq!(db.devices().unwrap().len(), 1);

    // Renaming onto a taken name is rejected too.
    let valve = db
        .add_device(&Device {
            name: "valve".to_string(),
            ..Default::default()
        })
        .unwrap();
    let mut renamed = db.device_by_id(&valve.to_hex()).unwrap();
    renamed.name = "pump".to_string();
    assert_eq!(
        db.update_device(&renamed).unwrap_err().kind(),
        ErrorKind::DuplicateName
    );
    assert_eq!(db.device_by_name("valve").unwrap().id, Some(valve));

    // Names that may repeat.
    for _ in 0..2 {
        db.add_command(&Command {
            name: "status".to_string(),
            ..Default::default()
        })
        .unwrap();
    }
    assert_eq!(db.commands_by_name("status").unwrap().len(), 2);
}

pub fn empty_names_resolve_by_scan(db: &Database) {
    // Empty names are not unique, and lookups still find the oldest holder.
    let first = db.add_device(&Device::default()).unwrap();
    db.add_device(&Device::default()).unwrap();
    assert_eq!(db.device_by_name("").unwrap().id, Some(first));
    assert_eq!(db.devices().unwrap().len(), 2);

    db.add_registration(&Registration::default()).unwrap();
    db.delete_registration_by_name("").unwrap();
    assert!(db.registrations().unwrap().is_empty());
    assert_eq!(
        db.delete_registration_by_name("").unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

pub fn update_reflected_on_read(db: &Database) {
    let id = db
        .add_device_service(&DeviceService {
            name: "modbus".to_string(),
            description: "before".to_string(),
            ..Default::default()
        })
        .unwrap();
    let stored = db.device_service_by_id(&id.to_hex()).unwrap();

    let mut changed = stored.clone();
    changed.description = "after".to_string();
    changed.labels = vec!["industrial".to_string()];
    db.update_device_service(&changed).unwrap();

    let read = db.device_service_by_name("modbus").unwrap();
    assert_eq!(read.description, "after");
    assert_eq!(read.labels, vec!["industrial".to_string()]);
    assert_eq!(read.created, stored.created);
    assert!(read.modified >= read.created);
    assert_eq!(db.device_services().unwrap().len(), 1);

    // The name itself may change, freeing the old one.
    let mut renamed = read.clone();
    renamed.name = "bacnet".to_string();
    db.update_device_service(&renamed).unwrap();
    assert_eq!(
        db.device_service_by_name("modbus").unwrap_err().kind(),
        ErrorKind::NotFound
    );
    db.add_device_service(&DeviceService {
        name: "modbus".to_string(),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(db.device_services().unwrap().len(), 2);
}

pub fn update_unknown_is_not_found(db: &Database) {
    let ghost = Schedule {
        id: Some(Id::generate()),
        name: "nightly".to_string(),
        ..Default::default()
    };
    assert_eq!(db.update_schedule(&ghost).unwrap_err().kind(), ErrorKind::NotFound);

    let unsaved = Schedule {
        name: "hourly".to_string(),
        ..Default::default()
    };
    assert_eq!(
        db.update_schedule(&unsaved).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert!(db.schedules().unwrap().is_empty());
}

pub fn delete_then_read_is_not_found(db: &Database) {
    let id = db.add_reading(&reading("d1", "temperature")).unwrap();
    db.add_reading(&reading("d1", "humidity")).unwrap();

    db.delete_reading_by_id(&id.to_hex()).unwrap();
    assert_eq!(
        db.reading_by_id(&id.to_hex()).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(db.reading_count().unwrap(), 1);

    let unknown = Id::generate().to_hex();
    assert_eq!(
        db.delete_reading_by_id(&unknown).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(db.reading_count().unwrap(), 1);

    let schedule = db
        .add_schedule(&Schedule {
            name: "nightly".to_string(),
            ..Default::default()
        })
        .unwrap();
    db.delete_schedule_by_id(&schedule.to_hex()).unwrap();
    assert_eq!(
        db.schedule_by_name("nightly").unwrap_err().kind(),
        ErrorKind::NotFound
    );
    // Deleting frees the unique name.
    db.add_schedule(&Schedule {
        name: "nightly".to_string(),
        ..Default::default()
    })
    .unwrap();
}

pub fn scrub_empties_collections(db: &Database) {
    populate_readings(db);
    db.add_value_descriptor(&descriptor("temperature", "C", "F", &[]))
        .unwrap();
    db.add_device(&Device {
        name: "pump".to_string(),
        ..Default::default()
    })
    .unwrap();
    db.add_registration(&Registration {
        name: "cloud".to_string(),
        ..Default::default()
    })
    .unwrap();

    db.scrub_all_events().unwrap();
    db.scrub_all_value_descriptors().unwrap();
    db.scrub_metadata().unwrap();
    db.scrub_all_registrations().unwrap();

    assert_eq!(db.reading_count().unwrap(), 0);
    assert!(db.value_descriptors().unwrap().is_empty());
    assert!(db.devices().unwrap().is_empty());
    assert!(db.registrations().unwrap().is_empty());

    // Scrubbing again succeeds, and the names are free again.
    db.scrub_all_events().unwrap();
    db.scrub_metadata().unwrap();
    db.add_device(&Device {
        name: "pump".to_string(),
        ..Default::default()
    })
    .unwrap();
}

pub fn close_session_twice(db: &Database) {
    db.add_reading(&reading("d1", "temperature")).unwrap();
    db.close_session();
    db.close_session();
    assert!(db.reading_count().is_err());
}

pub fn value_descriptor_predicates(db: &Database) {
    db.add_value_descriptor(&descriptor("temperature", "C", "F", &["climate"]))
        .unwrap();
    db.add_value_descriptor(&descriptor("humidity", "%", "F", &["climate"]))
        .unwrap();
    db.add_value_descriptor(&descriptor("switch", "", "B", &["power"]))
        .unwrap();

    assert_eq!(db.value_descriptors().unwrap().len(), 3);
    assert_eq!(db.value_descriptors_by_uom_label("C").unwrap().len(), 1);
    assert_eq!(db.value_descriptors_by_label("climate").unwrap().len(), 2);
    assert_eq!(db.value_descriptors_by_label("none").unwrap().len(), 0);
    assert_eq!(db.value_descriptors_by_type("F").unwrap().len(), 2);
    assert_eq!(
        db.value_descriptors_by_name(&["switch".to_string(), "missing".to_string()])
            .unwrap()
            .len(),
        1
    );

    let mut switch = db.value_descriptor_by_name("switch").unwrap();
    switch.description = "relay".to_string();
    db.update_value_descriptor(&switch).unwrap();
    assert_eq!(
        db.value_descriptor_by_name("switch").unwrap().description,
        "relay"
    );

    db.delete_value_descriptor_by_id(&hex(switch.id)).unwrap();
    assert_eq!(db.value_descriptors().unwrap().len(), 2);
}

pub fn reading_predicates(db: &Database) {
    for (device, name) in [
        ("d1", "temperature"),
        ("d1", "humidity"),
        ("d2", "temperature"),
        ("d2", "pressure"),
        ("d1", "temperature"),
    ] {
        db.add_reading(&reading(device, name)).unwrap();
    }

    assert_eq!(db.readings_by_value_descriptor("temperature", 10).unwrap().len(), 3);
    assert_eq!(db.readings_by_value_descriptor("temperature", 2).unwrap().len(), 2);
    assert_eq!(
        db.readings_by_value_descriptor_names(
            &["humidity".to_string(), "pressure".to_string()],
            10
        )
        .unwrap()
        .len(),
        2
    );
    assert_eq!(
        db.readings_by_device_and_value_descriptor("d1", "temperature", 10)
            .unwrap()
            .len(),
        2
    );
    assert_eq!(
        db.readings_by_device_and_value_descriptor("d2", "humidity", 10)
            .unwrap()
            .len(),
        0
    );

    let mut first = db.readings_by_device("d2", 1).unwrap().remove(0);
    first.value = "7".to_string();
    db.update_reading(&first).unwrap();
    assert_eq!(db.reading_by_id(&hex(first.id)).unwrap().value, "7");
}

pub fn addressable_predicates(db: &Database) {
    let mqtt = Addressable {
        name: "broker".to_string(),
        protocol: "TCP".to_string(),
        address: "10.0.0.5".to_string(),
        port: 1883,
        publisher: "edge".to_string(),
        topic: "telemetry".to_string(),
        ..Default::default()
    };
    let rest = Addressable {
        name: "rest".to_string(),
        protocol: "HTTP".to_string(),
        address: "10.0.0.6".to_string(),
        port: 48080,
        ..Default::default()
    };
    let id = db.add_addressable(&mqtt).unwrap();
    db.add_addressable(&rest).unwrap();

    assert_eq!(db.addressables().unwrap().len(), 2);
    assert_eq!(db.addressable_by_id(&id.to_hex()).unwrap().name, "broker");
    assert_eq!(db.addressable_by_name("rest").unwrap().port, 48080);
    assert_eq!(db.addressables_by_port(1883).unwrap().len(), 1);
    assert_eq!(db.addressables_by_port(1).unwrap().len(), 0);
    assert_eq!(db.addressables_by_publisher("edge").unwrap().len(), 1);
    assert_eq!(db.addressables_by_address("10.0.0.6").unwrap().len(), 1);
    assert_eq!(db.addressables_by_topic("telemetry").unwrap().len(), 1);

    let mut moved = db.addressable_by_name("rest").unwrap();
    moved.port = 1883;
    db.update_addressable(&moved).unwrap();
    assert_eq!(db.addressables_by_port(1883).unwrap().len(), 2);

    db.delete_addressable_by_id(&id.to_hex()).unwrap();
    assert_eq!(db.addressables().unwrap().len(), 1);
}

pub fn device_predicates(db: &Database) {
    let addressable = db
        .add_addressable(&Addressable {
            name: "plc".to_string(),
            ..Default::default()
        })
        .unwrap();
    let service = db
        .add_device_service(&DeviceService {
            name: "modbus".to_string(),
            addressable_id: Some(addressable),
            ..Default::default()
        })
        .unwrap();
    let profile = db
        .add_device_profile(&DeviceProfile {
            name: "pump-profile".to_string(),
            ..Default::default()
        })
        .unwrap();
    for (name, labels) in [("pump", vec!["water"]), ("valve", vec!["water", "gas"])] {
        db.add_device(&Device {
            name: name.to_string(),
            labels: labels.into_iter().map(String::from).collect(),
            addressable_id: Some(addressable),
            service_id: Some(service),
            profile_id: Some(profile),
            ..Default::default()
        })
        .unwrap();
    }
    db.add_device(&Device {
        name: "orphan".to_string(),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(
        db.device_services_by_addressable_id(&addressable.to_hex())
            .unwrap()
            .len(),
        1
    );
    assert_eq!(db.devices_by_profile_id(&profile.to_hex()).unwrap().len(), 2);
    assert_eq!(db.devices_by_service_id(&service.to_hex()).unwrap().len(), 2);
    assert_eq!(
        db.devices_by_addressable_id(&addressable.to_hex())
            .unwrap()
            .len(),
        2
    );
    assert_eq!(
        db.devices_by_profile_id(&Id::generate().to_hex())
            .unwrap()
            .len(),
        0
    );
    assert_eq!(db.devices_by_label("water").unwrap().len(), 2);
    assert_eq!(db.devices_by_label("gas").unwrap().len(), 1);
    assert_eq!(db.device_by_name("orphan").unwrap().service_id, None);

    let orphan = db.device_by_name("orphan").unwrap();
    db.delete_device_by_id(&hex(orphan.id)).unwrap();
    db.delete_device_service_by_id(&service.to_hex()).unwrap();
    assert_eq!(db.devices().unwrap().len(), 2);
    assert!(db.device_services().unwrap().is_empty());
}

pub fn profile_and_command_predicates(db: &Database) {
    let read = db
        .add_command(&Command {
            name: "read".to_string(),
            get: Some(Action {
                path: "/api/v1/read".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        })
        .unwrap();
    let write = db
        .add_command(&Command {
            name: "write".to_string(),
            ..Default::default()
        })
        .unwrap();

    let profiles = [
        ("acme-pump", "acme", "p100", vec![read], vec!["pump"]),
        ("acme-valve", "acme", "v200", vec![read, write], vec!["valve"]),
        ("other-pump", "other", "p100", vec![], vec!["pump"]),
    ];
    for (name, manufacturer, model, commands, labels) in profiles {
        db.add_device_profile(&DeviceProfile {
            name: name.to_string(),
            manufacturer: manufacturer.to_string(),
            model: model.to_string(),
            commands,
            labels: labels.into_iter().map(String::from).collect(),
            ..Default::default()
        })
        .unwrap();
    }

    assert_eq!(db.device_profiles().unwrap().len(), 3);
    assert_eq!(db.device_profiles_by_model("p100").unwrap().len(), 2);
    assert_eq!(db.device_profiles_by_manufacturer("acme").unwrap().len(), 2);
    assert_eq!(
        db.device_profiles_by_manufacturer_and_model("acme", "p100")
            .unwrap()
            .len(),
        1
    );
    assert_eq!(db.device_profiles_by_label("pump").unwrap().len(), 2);
    assert_eq!(
        db.device_profiles_using_command(&read.to_hex()).unwrap().len(),
        2
    );
    assert_eq!(
        db.device_profiles_using_command(&write.to_hex()).unwrap().len(),
        1
    );
    assert_eq!(
        db.device_profile_by_name("acme-valve").unwrap().commands,
        vec![read, write]
    );

    let command = db.command_by_id(&read.to_hex()).unwrap();
    assert_eq!(
        command.get.map(|action| action.path),
        Some("/api/v1/read".to_string())
    );
    let mut renamed = db.command_by_id(&write.to_hex()).unwrap();
    renamed.name = "set".to_string();
    db.update_command(&renamed).unwrap();
    assert_eq!(db.commands_by_name("set").unwrap().len(), 1);
    db.delete_command_by_id(&write.to_hex()).unwrap();
    assert_eq!(db.commands().unwrap().len(), 1);

    let mut profile = db.device_profile_by_name("other-pump").unwrap();
    profile.model = "p300".to_string();
    db.update_device_profile(&profile).unwrap();
    assert_eq!(db.device_profiles_by_model("p100").unwrap().len(), 1);
    db.delete_device_profile_by_id(&hex(profile.id)).unwrap();
    assert_eq!(
        db.device_profile_by_id(&hex(profile.id)).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

pub fn report_schedule_predicates(db: &Database) {
    let addressable = db
        .add_addressable(&Addressable {
            name: "callback".to_string(),
            ..Default::default()
        })
        .unwrap();
    db.add_schedule(&Schedule {
        name: "every-minute".to_string(),
        frequency: "PT1M".to_string(),
        ..Default::default()
    })
    .unwrap();
    for (name, service) in [("poll-a", "modbus"), ("poll-b", "modbus"), ("poll-c", "bacnet")] {
        db.add_schedule_event(&ScheduleEvent {
            name: name.to_string(),
            schedule: "every-minute".to_string(),
            addressable_id: Some(addressable),
            service: service.to_string(),
            ..Default::default()
        })
        .unwrap();
    }
    for (name, device, event) in [
        ("r1", "pump", "poll-a"),
        ("r2", "pump", "poll-b"),
        ("r3", "valve", "poll-a"),
    ] {
        db.add_device_report(&DeviceReport {
            name: name.to_string(),
            device: device.to_string(),
            event: event.to_string(),
            expected: vec!["temperature".to_string()],
            ..Default::default()
        })
        .unwrap();
    }

    assert_eq!(db.schedules().unwrap().len(), 1);
    assert_eq!(db.schedule_by_name("every-minute").unwrap().frequency, "PT1M");
    assert_eq!(db.schedule_events().unwrap().len(), 3);
    assert_eq!(db.schedule_event_by_name("poll-c").unwrap().service, "bacnet");
    assert_eq!(
        db.schedule_events_by_addressable_id(&addressable.to_hex())
            .unwrap()
            .len(),
        3
    );
    assert_eq!(db.schedule_events_by_service_name("modbus").unwrap().len(), 2);
    assert_eq!(
        db.schedule_events_by_schedule_name("every-minute")
            .unwrap()
            .len(),
        3
    );
    assert_eq!(db.device_reports().unwrap().len(), 3);
    assert_eq!(db.device_report_by_name("r3").unwrap().device, "valve");
    assert_eq!(db.device_reports_by_device_name("pump").unwrap().len(), 2);
    assert_eq!(
        db.device_reports_by_schedule_event_name("poll-a")
            .unwrap()
            .len(),
        2
    );

    let mut report = db.device_report_by_name("r2").unwrap();
    report.event = "poll-a".to_string();
    db.update_device_report(&report).unwrap();
    assert_eq!(
        db.device_reports_by_schedule_event_name("poll-a")
            .unwrap()
            .len(),
        3
    );
    db.delete_device_report_by_id(&hex(report.id)).unwrap();
    assert_eq!(
        db.device_report_by_id(&hex(report.id)).unwrap_err().kind(),
        ErrorKind::NotFound
    );

    let mut event = db.schedule_event_by_name("poll-c").unwrap();
    event.service = "modbus".to_string();
    db.update_schedule_event(&event).unwrap();
    assert_eq!(db.schedule_events_by_service_name("modbus").unwrap().len(), 3);
    db.delete_schedule_event_by_id(&hex(event.id)).unwrap();
    assert_eq!(
        db.schedule_event_by_id(&hex(event.id)).unwrap_err().kind(),
        ErrorKind::NotFound
    );

    let mut schedule = db.schedule_by_name("every-minute").unwrap();
    schedule.run_once = true;
    db.update_schedule(&schedule).unwrap();
    assert!(db.schedule_by_id(&hex(schedule.id)).unwrap().run_once);
}

pub fn provision_watcher_predicates(db: &Database) {
    let profile = Id::generate();
    let service = Id::generate();
    let watchers = [
        ("by-mac", "mac", "00:11:22", Some(profile), Some(service)),
        ("by-serial", "serial", "SN-1", Some(profile), None),
        ("by-mac-2", "mac", "33:44:55", None, Some(service)),
    ];
    for (name, key, value, profile_id, service_id) in watchers {
        db.add_provision_watcher(&ProvisionWatcher {
            name: name.to_string(),
            identifiers: BTreeMap::from([(key.to_string(), value.to_string())]),
            profile_id,
            service_id,
            ..Default::default()
        })
        .unwrap();
    }

    assert_eq!(db.provision_watchers().unwrap().len(), 3);
    assert_eq!(
        db.provision_watchers_by_profile_id(&profile.to_hex())
            .unwrap()
            .len(),
        2
    );
    assert_eq!(
        db.provision_watchers_by_service_id(&service.to_hex())
            .unwrap()
            .len(),
        2
    );
    assert_eq!(
        db.provision_watchers_by_identifier("mac", "00:11:22")
            .unwrap()
            .len(),
        1
    );
    assert_eq!(
        db.provision_watchers_by_identifier("serial", "00:11:22")
            .unwrap()
            .len(),
        0
    );

    let mut watcher = db.provision_watcher_by_name("by-serial").unwrap();
    watcher
        .identifiers
        .insert("mac".to_string(), "00:11:22".to_string());
    db.update_provision_watcher(&watcher).unwrap();
    assert_eq!(
        db.provision_watchers_by_identifier("mac", "00:11:22")
            .unwrap()
            .len(),
        2
    );
    assert_eq!(
        db.provision_watcher_by_id(&hex(watcher.id))
            .unwrap()
            .identifiers
            .len(),
        2
    );
    db.delete_provision_watcher_by_id(&hex(watcher.id)).unwrap();
    assert_eq!(db.provision_watchers().unwrap().len(), 2);
}

pub fn registrations(db: &Database) {
    let id = db
        .add_registration(&Registration {
            name: "cloud".to_string(),
            enable: true,
            ..Default::default()
        })
        .unwrap();
    db.add_registration(&Registration {
        name: "archive".to_string(),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(db.registrations().unwrap().len(), 2);
    assert!(db.registration_by_id(&id.to_hex()).unwrap().enable);
    assert_eq!(hex(db.registration_by_name("cloud").unwrap().id), id.to_hex());
    assert_eq!(
        db.add_registration(&Registration {
            name: "cloud".to_string(),
            ..Default::default()
        })
        .unwrap_err()
        .kind(),
        ErrorKind::DuplicateName
    );

    let mut archive = db.registration_by_name("archive").unwrap();
    archive.enable = true;
    db.update_registration(&archive).unwrap();
    assert!(db.registration_by_name("archive").unwrap().enable);

    db.delete_registration_by_name("archive").unwrap();
    assert_eq!(
        db.delete_registration_by_name("archive").unwrap_err().kind(),
        ErrorKind::NotFound
    );
    db.delete_registration_by_id(&id.to_hex()).unwrap();
    assert!(db.registrations().unwrap().is_empty());
}
