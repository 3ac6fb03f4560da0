pub trait Transformer {
    type Input;
    type Output;

    fn transform(&mut self, input: Self::Input) -> Self::Output;
}

// Feeds every element through the transformer in order. The transformer keeps
// whatever state it accumulated, so callers can inspect it afterwards.
pub fn transform_all<T, I>(transformer: &mut T, input: I) -> Vec<T::Output>
where
    T: Transformer,
    I: IntoIterator<Item = T::Input>,
{
    input
        .into_iter()
        .map(|v| transformer.transform(v))
        .collect()
}
