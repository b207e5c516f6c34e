// A triangle defined by three vertices.
// The members a, b, and c are zero-based indices into the vertex array
// of the mesh that owns the face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Face {
    pub a: usize,
    pub b: usize,
    pub c: usize,
}

impl Face {
    pub const fn new(a: usize, b: usize, c: usize) -> Self {
        Self { a, b, c }
    }

    pub const fn indices(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }
}
