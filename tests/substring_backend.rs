use propsift::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
struct TestData {
  id: u32,
  name: String,
}

fn generate(count: usize) -> Vec<TestData> {
  let names = ["Material", "Mesh", "Texture", "Shader"];
  (0..count)
    .map(|i| TestData {
      id: i as u32,
      name: format!("{} {}", names[i % names.len()], i),
    })
    .collect()
}

#[test]
fn no_search_data_returns_no_results() {
  let data = generate(100);
  let backend: SubstringBackend<TestData> = SubstringBackend::new();

  assert!(backend.parse("Mesh").apply(&data).is_empty());
}

#[test]
fn search_data_property_enables_matching() {
  let data = generate(100);
  let mut backend = SubstringBackend::new();
  backend.add_data_property("name".into());

  assert_eq!(backend.parse("Mesh").apply(&data).len(), 25);
  // Matching is case-insensitive.
  assert_eq!(backend.parse("mesh").apply(&data).len(), 25);
}

#[test]
fn empty_query_is_identity() {
  let data = generate(100);
  let mut backend = SubstringBackend::new();
  backend.add_data_property("name".into());

  let query = backend.parse("");
  let ids: Vec<u32> = query.apply(&data).iter().map(|d| d.id).collect();
  assert_eq!(ids, (0..100).collect::<Vec<u32>>());
}

#[test]
fn whole_string_matches_as_one_substring() {
  let data = generate(100);
  let mut backend = SubstringBackend::new();
  backend.add_data_property("name".into());

  // No tokenization: the space is part of the needle.
  let query = backend.parse("Mesh 1");
  let ids: Vec<u32> = query.apply(&data).iter().map(|d| d.id).collect();
  assert_eq!(ids, vec![1, 13, 17]);

  // Tokens are still reported for UI consumption.
  assert_eq!(query.tokens(), vec!["Mesh", "1"]);
}

#[test]
fn filter_registrations_are_no_ops() {
  let data = generate(100);
  let mut backend = SubstringBackend::new();
  backend.add_data_property("name".into());

  SearchBackend::add_search_filter_property(&mut backend, "id", "id".into(), None).unwrap();
  SearchBackend::add_search_filter_callback(
    &mut backend,
    "len",
    Box::new(|d: &TestData| FilterValue::from(d.name.len())),
    None,
  )
  .unwrap();

  // Filter syntax is just literal query text in this mode.
  assert!(backend.parse("id<10").apply(&data).is_empty());
  assert!(backend.parse("len=6").apply(&data).is_empty());
}

#[test]
fn callback_search_data_is_projected() {
  let data = generate(10);
  let mut backend = SubstringBackend::new();
  backend.add_data_callback(|d: &TestData| vec![format!("#{}", d.id)]);

  assert_eq!(backend.parse("#7").apply(&data).len(), 1);
}
