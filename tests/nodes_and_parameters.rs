//! Node store behaviour: template-driven creation, identifier assignment,
//! parameter slots, string fields, and change batching.

use mesh_fields::prelude::*;

fn coordinates() -> Field {
    Field::finite_element("coordinates", 3, CoordinateSystemType::RectangularCartesian).unwrap()
}

#[test]
fn identifiers_fill_gaps_from_zero() {
    let field = coordinates();
    let mut nodes = Nodeset::new("nodes");
    let mut template = nodes.create_template();
    template.define_field(&field).unwrap();

    let a = nodes.create_node(None, &template).unwrap();
    let b = nodes.create_node(Some(NodeId::new(5)), &template).unwrap();
    let c = nodes.create_node(None, &template).unwrap();
    assert_eq!((a.get(), b.get(), c.get()), (0, 5, 1));

    nodes.destroy_node(a).unwrap();
    let d = nodes.create_node(None, &template).unwrap();
    assert_eq!(d.get(), 0);

    assert_eq!(
        nodes.create_node(Some(b), &template).unwrap_err(),
        MeshFieldsError::DuplicateNodeIdentifier(b)
    );
}

#[test]
fn parameters_round_trip_per_derivative_and_version() {
    let field = coordinates();
    let mut nodes = Nodeset::new("nodes");
    let mut template = nodes.create_template();
    template.define_field(&field).unwrap();
    template
        .set_value_number_of_versions(&field, DerivativeLabel::D_Ds1, 2)
        .unwrap();

    let node = nodes.create_node(None, &template).unwrap();
    let mut cache = FieldCache::new();
    cache.bind_node(node);

    nodes
        .assign_real(&cache, &field, &[1.0, 2.0, 3.0])
        .unwrap();
    nodes
        .set_node_parameters(&cache, &field, DerivativeLabel::D_Ds1, 2, &[0.1, 0.2, 0.3])
        .unwrap();

    assert_eq!(
        nodes
            .get_node_parameters(&cache, &field, DerivativeLabel::Value, 1)
            .unwrap(),
        vec![1.0, 2.0, 3.0]
    );
    // version 1 was never written and stays zero
    assert_eq!(
        nodes
            .get_node_parameters(&cache, &field, DerivativeLabel::D_Ds1, 1)
            .unwrap(),
        vec![0.0, 0.0, 0.0]
    );
    assert_eq!(
        nodes
            .get_node_parameters(&cache, &field, DerivativeLabel::D_Ds1, 2)
            .unwrap(),
        vec![0.1, 0.2, 0.3]
    );

    // a slot the node does not store
    assert_eq!(
        nodes
            .get_node_parameters(&cache, &field, DerivativeLabel::D_Ds3, 1)
            .unwrap_err(),
        MeshFieldsError::UndefinedParameter {
            node,
            field: "coordinates".into(),
            derivative: DerivativeLabel::D_Ds3,
            version: 1,
        }
    );
    // wrong component count is rejected before any slot lookup
    assert_eq!(
        nodes
            .set_node_parameters(&cache, &field, DerivativeLabel::Value, 1, &[1.0])
            .unwrap_err(),
        MeshFieldsError::InvalidComponentCount {
            field: "coordinates".into(),
            expected: 3,
            found: 1,
        }
    );
}

#[test]
fn merge_template_extends_storage_preserving_values() {
    let field = coordinates();
    let mut nodes = Nodeset::new("nodes");
    let mut template = nodes.create_template();
    template.define_field(&field).unwrap();

    let node = nodes.create_node(None, &template).unwrap();
    let mut cache = FieldCache::new();
    cache.bind_node(node);
    nodes
        .assign_real(&cache, &field, &[4.0, 5.0, 6.0])
        .unwrap();

    let mut wider = nodes.create_template();
    wider.define_field(&field).unwrap();
    wider
        .set_value_number_of_versions(&field, DerivativeLabel::D_Ds1, 1)
        .unwrap();
    nodes.merge_template(node, &wider).unwrap();

    assert_eq!(
        nodes.value_number_of_versions(node, &field, DerivativeLabel::D_Ds1),
        1
    );
    assert_eq!(
        nodes
            .get_node_parameters(&cache, &field, DerivativeLabel::Value, 1)
            .unwrap(),
        vec![4.0, 5.0, 6.0]
    );
    assert_eq!(
        nodes
            .get_node_parameters(&cache, &field, DerivativeLabel::D_Ds1, 1)
            .unwrap(),
        vec![0.0, 0.0, 0.0]
    );
}

#[test]
fn string_fields_are_separate_from_parameters() {
    let name_field = Field::stored_string("name");
    let mut nodes = Nodeset::new("nodes");
    let template = nodes.create_template();
    let node = nodes.create_node(None, &template).unwrap();

    let mut cache = FieldCache::new();
    cache.bind_node(node);
    nodes.assign_string(&cache, &name_field, "apex").unwrap();
    assert_eq!(nodes.string_value(node, &name_field), Some("apex"));

    // real-valued fields reject string assignment
    let err = nodes
        .assign_string(&cache, &coordinates(), "nope")
        .unwrap_err();
    assert_eq!(err, MeshFieldsError::InvalidField("coordinates".into()));
}

#[test]
fn scoped_edits_fire_one_notification() {
    let field = coordinates();
    let mut nodes = Nodeset::new("nodes");
    let mut template = nodes.create_template();
    template.define_field(&field).unwrap();
    let tracker = nodes.change_tracker();

    {
        let _scope = ChangeScope::begin(nodes.change_tracker());
        let mut cache = FieldCache::new();
        for _ in 0..10 {
            let node = nodes.create_node(None, &template).unwrap();
            cache.bind_node(node);
            nodes.assign_real(&cache, &field, &[0.0, 0.0, 0.0]).unwrap();
        }
        assert_eq!(tracker.notifications(), 0);
    }
    assert_eq!(tracker.notifications(), 1);

    // outside any scope each edit notifies immediately
    nodes.create_node(None, &template).unwrap();
    assert_eq!(tracker.notifications(), 2);
}
