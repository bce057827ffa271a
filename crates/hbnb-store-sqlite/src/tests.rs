//! Integration tests for `SqliteRepository` against an in-memory database.

use std::sync::Arc;

use serde_json::{Map, Value, json};

use hbnb_core::{
  Error as DomainError,
  amenity::Amenity,
  city::{City, NewCity},
  country::Country,
  entity::{Entity, Model},
  manager::RepositoryManager,
  place::{NewPlace, Place},
  record::Record,
  registry::TypeRegistry,
  repository::Repository,
  review::{NewReview, Review},
  user::{NewUser, User},
};

use crate::SqliteRepository;

async fn repo() -> SqliteRepository {
  SqliteRepository::open_in_memory()
    .await
    .expect("in-memory database")
}

async fn manager() -> RepositoryManager<SqliteRepository> {
  RepositoryManager::new(Arc::new(TypeRegistry::standard()), repo().await)
}

fn fields(value: Value) -> Map<String, Value> {
  match value {
    Value::Object(map) => map,
    other => panic!("expected an object, got {other}"),
  }
}

fn new_user(email: &str) -> NewUser {
  NewUser {
    email:      email.to_owned(),
    password:   "hunter2".to_owned(),
    first_name: "Ada".to_owned(),
    last_name:  "Lovelace".to_owned(),
    is_admin:   false,
  }
}

// ─── Raw contract ────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_then_get_returns_equal_fields() {
  let r = repo().await;
  let amenity = Amenity::new("Wifi");
  r.save(amenity.clone().into_record()).await.unwrap();

  let fetched = r.get("Amenity", &amenity.id).await.unwrap().unwrap();
  let Record::Amenity(fetched) = fetched else {
    panic!("wrong variant");
  };
  assert_eq!(fetched.id, amenity.id);
  assert_eq!(fetched.name, "Wifi");
  assert_eq!(fetched.created_at, amenity.created_at);
  assert_eq!(fetched.updated_at, amenity.updated_at);
}

#[tokio::test]
async fn get_missing_id_is_none() {
  let r = repo().await;
  assert!(r.get("Amenity", "nope").await.unwrap().is_none());
}

#[tokio::test]
async fn unknown_type_name_is_empty() {
  let r = repo().await;
  assert!(r.get_all("Spaceship").await.unwrap().is_empty());
  assert!(r.get("Spaceship", "x").await.unwrap().is_none());
}

#[tokio::test]
async fn get_all_lists_every_row_of_a_type() {
  let r = repo().await;
  for name in ["Wifi", "Pool", "Sauna"] {
    r.save(Amenity::new(name).into_record()).await.unwrap();
  }
  r.save(
    Country::new("Uruguay", "UY")
      .unwrap()
      .into_record(),
  )
  .await
  .unwrap();

  let mut names: Vec<String> = r
    .get_all("Amenity")
    .await
    .unwrap()
    .into_iter()
    .filter_map(Amenity::from_record)
    .map(|a| a.name)
    .collect();
  names.sort();
  assert_eq!(names, ["Pool", "Sauna", "Wifi"]);
  assert_eq!(r.get_all("Country").await.unwrap().len(), 1);
}

#[tokio::test]
async fn countries_are_keyed_by_code() {
  let r = repo().await;
  r.save(Country::new("Uruguay", "UY").unwrap().into_record())
    .await
    .unwrap();

  let fetched = r.get("Country", "UY").await.unwrap().unwrap();
  let Record::Country(country) = fetched else {
    panic!("wrong variant");
  };
  assert_eq!(country.name, "Uruguay");
}

#[tokio::test]
async fn duplicate_primary_key_is_an_error() {
  let r = repo().await;
  let amenity = Amenity::new("Wifi");
  r.save(amenity.clone().into_record()).await.unwrap();
  assert!(r.save(amenity.into_record()).await.is_err());
}

#[tokio::test]
async fn update_writes_row_as_given() {
  let r = repo().await;
  let mut amenity = Amenity::new("Wifi");
  r.save(amenity.clone().into_record()).await.unwrap();

  amenity.name = "Fast wifi".to_owned();
  let stored = r.update(amenity.clone().into_record()).await.unwrap();
  assert!(stored.is_some());

  let fetched = r.get("Amenity", &amenity.id).await.unwrap().unwrap();
  let Record::Amenity(fetched) = fetched else {
    panic!("wrong variant");
  };
  assert_eq!(fetched.name, "Fast wifi");
  assert_eq!(fetched.updated_at, amenity.updated_at);
}

#[tokio::test]
async fn update_missing_row_is_none() {
  let r = repo().await;
  let stored = r.update(Amenity::new("Ghost").into_record()).await.unwrap();
  assert!(stored.is_none());
}

#[tokio::test]
async fn delete_removes_row_once() {
  let r = repo().await;
  let record = Amenity::new("Wifi").into_record();
  r.save(record.clone()).await.unwrap();

  assert!(r.delete(&record).await.unwrap());
  assert!(!r.delete(&record).await.unwrap());
  assert!(r.get("Amenity", record.key()).await.unwrap().is_none());
}

#[tokio::test]
async fn reload_keeps_rows() {
  let r = repo().await;
  r.save(Amenity::new("Wifi").into_record()).await.unwrap();
  r.reload().await.unwrap();
  assert_eq!(r.get_all("Amenity").await.unwrap().len(), 1);
}

#[tokio::test]
async fn place_numbers_survive_storage() {
  let m = manager().await;
  Country::create(&m, "Uruguay", "UY").await.unwrap();
  let city = City::create(&m, NewCity {
    name:         "Montevideo".to_owned(),
    country_code: "UY".to_owned(),
  })
  .await
  .unwrap();
  let host = User::create(&m, new_user("host@example.com")).await.unwrap();

  let place = Place::create(&m, NewPlace {
    name:                "Loft".to_owned(),
    description:         "Sunny".to_owned(),
    address:             "Rambla 1".to_owned(),
    latitude:            -34.9,
    longitude:           -56.16,
    host_id:             host.id.clone(),
    city_id:             city.id.clone(),
    price_per_night:     120,
    number_of_rooms:     2,
    number_of_bathrooms: 1,
    max_guests:          4,
  })
  .await
  .unwrap();

  let fetched: Place = m.find(&place.id).await.unwrap().unwrap();
  assert_eq!(fetched.latitude, -34.9);
  assert_eq!(fetched.longitude, -56.16);
  assert_eq!(fetched.price_per_night, 120);
  assert_eq!(fetched.max_guests, 4);
  assert_eq!(fetched.host_id, host.id);
}

// ─── Through the manager ─────────────────────────────────────────────────────

#[tokio::test]
async fn manager_update_refreshes_updated_at() {
  let m = manager().await;
  let user = User::create(&m, new_user("a@example.com")).await.unwrap();
  let before = user.updated_at();

  let updated = User::update(&m, user.id.as_str(), fields(json!({
    "first_name": "Grace"
  })))
  .await
  .unwrap()
  .unwrap();
  assert_eq!(updated.first_name, "Grace");
  assert!(updated.updated_at() >= before);

  let fetched: User = m.find(&user.id).await.unwrap().unwrap();
  assert_eq!(fetched.first_name, "Grace");
  assert_eq!(fetched.updated_at, updated.updated_at);
  assert!(fetched.verify_password("hunter2"));
}

#[tokio::test]
async fn admin_flag_is_stored() {
  let m = manager().await;
  let mut input = new_user("root@example.com");
  input.is_admin = true;
  let admin = User::create(&m, input).await.unwrap();

  let fetched: User = m.find(&admin.id).await.unwrap().unwrap();
  assert!(fetched.is_admin);
}

#[tokio::test]
async fn review_lookups_filter_by_place_and_user() {
  let m = manager().await;
  Country::create(&m, "Uruguay", "UY").await.unwrap();
  let city = City::create(&m, NewCity {
    name:         "Montevideo".to_owned(),
    country_code: "UY".to_owned(),
  })
  .await
  .unwrap();
  let host = User::create(&m, new_user("host@example.com")).await.unwrap();
  let guest = User::create(&m, new_user("guest@example.com")).await.unwrap();
  let place = Place::create(&m, NewPlace {
    name:                "Loft".to_owned(),
    description:         String::new(),
    address:             String::new(),
    latitude:            0.0,
    longitude:           0.0,
    host_id:             host.id.clone(),
    city_id:             city.id.clone(),
    price_per_night:     0,
    number_of_rooms:     0,
    number_of_bathrooms: 0,
    max_guests:          0,
  })
  .await
  .unwrap();

  Review::create(&m, NewReview {
    place_id: place.id.clone(),
    user_id:  guest.id.clone(),
    comment:  "Lovely".to_owned(),
    rating:   4.5,
  })
  .await
  .unwrap();

  assert_eq!(Review::for_place(&m, &place.id).await.unwrap().len(), 1);
  assert_eq!(Review::by_user(&m, &guest.id).await.unwrap().len(), 1);
  assert!(Review::by_user(&m, &host.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn city_requires_existing_country() {
  let m = manager().await;
  let err = City::create(&m, NewCity {
    name:         "Atlantis".to_owned(),
    country_code: "ZZ".to_owned(),
  })
  .await
  .unwrap_err();
  assert!(matches!(err, DomainError::CountryNotFound(code) if code == "ZZ"));
}

#[tokio::test]
async fn remove_by_id() {
  let m = manager().await;
  let amenity = Amenity::create(&m, hbnb_core::amenity::NewAmenity {
    name: "Wifi".to_owned(),
  })
  .await
  .unwrap();

  assert!(m.remove::<Amenity>(amenity.id.as_str()).await.unwrap());
  assert!(!m.remove::<Amenity>(amenity.id.as_str()).await.unwrap());
}
