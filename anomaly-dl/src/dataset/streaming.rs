use super::*;
use crate::{
    common::*,
    config::{ImageSize, TaskType},
};

/// The stream adapter over a random-access dataset, for consumers that
/// enumerate samples instead of indexing them.
#[derive(Debug)]
pub struct RandomAccessStream<D>
where
    D: 'static + FileDataset + RandomAccessDataset + Sync,
{
    dataset: Arc<D>,
}

impl<D> RandomAccessStream<D>
where
    D: FileDataset + RandomAccessDataset + Sync,
{
    pub fn new(dataset: D) -> Self {
        Self {
            dataset: Arc::new(dataset),
        }
    }
}

impl<D> GenericDataset for RandomAccessStream<D>
where
    D: 'static + FileDataset + RandomAccessDataset + Sync,
{
    fn task(&self) -> TaskType {
        self.dataset.task()
    }

    fn image_size(&self) -> ImageSize {
        self.dataset.image_size()
    }

    fn input_channels(&self) -> usize {
        self.dataset.input_channels()
    }
}

impl<D> StreamingDataset for RandomAccessStream<D>
where
    D: 'static + FileDataset + RandomAccessDataset + Sync,
{
    fn stream(&self) -> Result<Pin<Box<dyn Stream<Item = Result<Sample>> + Send>>> {
        // fail fast on a dataset that was never set up, instead of
        // yielding an empty stream
        let num_records = self.dataset.records()?.len();
        let dataset = self.dataset.clone();
        let stream = stream::iter(0..num_records).then(move |index| {
            let dataset = dataset.clone();
            async move {
                let sample = dataset.nth(index).await?;
                Ok(sample)
            }
        });

        Ok(Box::pin(stream))
    }
}
