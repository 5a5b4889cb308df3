use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// The MiniC type lattice. All types are interned: structurally identical
/// types share one allocation, so `Ty` equality is pointer identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TyKind {
    Void,
    Int32,
    Pointer(Ty),
    /// `Array(element, count)`. A count of 0 marks the unknown first
    /// dimension of an array-typed function parameter.
    Array(Ty, u32),
}

#[derive(Debug, Clone, Eq)]
pub struct Ty(Rc<TyKind>);

impl PartialEq for Ty {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Hash for Ty {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as usize).hash(state);
    }
}

thread_local! {
    static REGISTRY: RefCell<HashMap<TyKind, Ty>> = RefCell::new(HashMap::new());
}

impl Ty {
    fn intern(kind: TyKind) -> Ty {
        REGISTRY.with(|registry| {
            let mut registry = registry.borrow_mut();
            if let Some(ty) = registry.get(&kind) {
                return ty.clone();
            }
            let ty = Ty(Rc::new(kind.clone()));
            registry.insert(kind, ty.clone());
            ty
        })
    }

    pub fn void() -> Ty {
        Ty::intern(TyKind::Void)
    }

    pub fn int32() -> Ty {
        Ty::intern(TyKind::Int32)
    }

    pub fn pointer_of(pointee: &Ty) -> Ty {
        Ty::intern(TyKind::Pointer(pointee.clone()))
    }

    pub fn array_of(element: &Ty, count: u32) -> Ty {
        Ty::intern(TyKind::Array(element.clone(), count))
    }

    pub fn kind(&self) -> &TyKind {
        &self.0
    }

    pub fn is_void(&self) -> bool {
        matches!(*self.0, TyKind::Void)
    }

    pub fn is_int32(&self) -> bool {
        matches!(*self.0, TyKind::Int32)
    }

    pub fn is_pointer(&self) -> bool {
        matches!(*self.0, TyKind::Pointer(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(*self.0, TyKind::Array(..))
    }

    pub fn pointee(&self) -> Option<Ty> {
        match &*self.0 {
            TyKind::Pointer(pointee) => Some(pointee.clone()),
            _ => None,
        }
    }

    pub fn element(&self) -> Option<Ty> {
        match &*self.0 {
            TyKind::Array(element, _) => Some(element.clone()),
            _ => None,
        }
    }

    pub fn count(&self) -> Option<u32> {
        match &*self.0 {
            TyKind::Array(_, count) => Some(*count),
            _ => None,
        }
    }

    /// The scalar type underneath every array layer.
    pub fn base_element(&self) -> Ty {
        let mut cur = self.clone();
        while let Some(element) = cur.element() {
            cur = element;
        }
        cur
    }

    /// Total element count of an array type, outer dimensions included.
    pub fn flat_count(&self) -> u32 {
        let mut total: u32 = 1;
        let mut cur = self.clone();
        loop {
            let next = match &*cur.0 {
                TyKind::Array(element, count) => {
                    total = total.saturating_mul(*count);
                    element.clone()
                }
                _ => break,
            };
            cur = next;
        }
        total
    }

    /// Bracketed dimension list, outermost first: `[5][4]` for
    /// `Array(Array(i32, 4), 5)`. Empty for non-array types.
    pub fn dim_string(&self) -> String {
        let mut out = String::new();
        let mut cur = self.clone();
        loop {
            let next = match &*cur.0 {
                TyKind::Array(element, count) => {
                    out.push_str(&format!("[{}]", count));
                    element.clone()
                }
                _ => break,
            };
            cur = next;
        }
        out
    }

    /// Dimension counts, outermost first.
    pub fn dims(&self) -> Vec<u32> {
        let mut dims = Vec::new();
        let mut cur = self.clone();
        loop {
            let next = match &*cur.0 {
                TyKind::Array(element, count) => {
                    dims.push(*count);
                    element.clone()
                }
                _ => break,
            };
            cur = next;
        }
        dims
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &*self.0 {
            TyKind::Void => write!(f, "void"),
            TyKind::Int32 => write!(f, "i32"),
            TyKind::Pointer(pointee) => write!(f, "{}*", pointee),
            TyKind::Array(..) => write!(f, "{}{}", self.base_element(), self.dim_string()),
        }
    }
}
