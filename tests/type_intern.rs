use minicc::ty::Ty;

#[test]
fn structurally_equal_types_share_identity() {
    assert_eq!(
        Ty::pointer_of(&Ty::pointer_of(&Ty::int32())),
        Ty::pointer_of(&Ty::pointer_of(&Ty::int32()))
    );
    assert_eq!(Ty::array_of(&Ty::int32(), 4), Ty::array_of(&Ty::int32(), 4));
    assert_eq!(Ty::void(), Ty::void());
}

#[test]
fn different_types_have_different_identity() {
    assert_ne!(Ty::int32(), Ty::void());
    assert_ne!(Ty::array_of(&Ty::int32(), 4), Ty::array_of(&Ty::int32(), 5));
    assert_ne!(Ty::pointer_of(&Ty::int32()), Ty::int32());
}

#[test]
fn array_accessors_and_dim_string() {
    let arr = Ty::array_of(&Ty::array_of(&Ty::int32(), 4), 5);
    assert!(arr.is_array());
    assert!(!arr.is_pointer());
    assert_eq!(arr.count(), Some(5));
    assert_eq!(arr.element(), Some(Ty::array_of(&Ty::int32(), 4)));
    assert_eq!(arr.base_element(), Ty::int32());
    assert_eq!(arr.dims(), vec![5, 4]);
    assert_eq!(arr.dim_string(), "[5][4]");
    assert_eq!(arr.flat_count(), 20);
    assert_eq!(arr.to_string(), "i32[5][4]");
}

#[test]
fn pointer_accessors() {
    let arr = Ty::array_of(&Ty::int32(), 3);
    let ptr = Ty::pointer_of(&arr);
    assert!(ptr.is_pointer());
    assert_eq!(ptr.pointee(), Some(arr));
    assert_eq!(ptr.to_string(), "i32[3]*");
    assert_eq!(Ty::pointer_of(&Ty::int32()).to_string(), "i32*");
}

#[test]
fn scalar_display() {
    assert_eq!(Ty::void().to_string(), "void");
    assert_eq!(Ty::int32().to_string(), "i32");
    assert_eq!(Ty::int32().dim_string(), "");
}
